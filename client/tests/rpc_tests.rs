use axum::{extract::State, routing::post, Json, Router};
use capymon_client::executor::{self, ActionEffect, Target};
use capymon_client::kiosk::{self, KioskMatch, MatchStatus, OwnedKiosk};
use capymon_client::ledger::{EntryCall, EventFilter, RemoteLedger};
use capymon_client::network::{Signer, SuiLedger};
use capymon_client::observer;
use capymon_client::{ClientConfig, ClientError};
use capymon_core::{ArenaRef, Commitment, MatchKind, MemoryStore, TypeTable};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ARENA: &str = "0xa7e7a";
const PACKAGE: &str = "0xpkg";
const ALICE: &str = "0xa1";

/// Just enough of a Sui full node and faucet to drive `SuiLedger`.
#[derive(Default)]
struct FakeNode {
    objects: HashMap<String, Value>,
    /// Keyed by (parent id, key type).
    dynamic_fields: HashMap<(String, String), Value>,
    /// Keyed by (owner, struct type).
    owned: HashMap<(String, String), Vec<Value>>,
    failed_status: bool,
    reject_move_call: bool,
    tx_events: Vec<Value>,
    created: Vec<Value>,
    pending_events: Vec<Value>,
    calls: Vec<(String, Value)>,
    faucet_requests: Vec<String>,
}

type Shared = Arc<Mutex<FakeNode>>;

async fn rpc(State(node): State<Shared>, Json(req): Json<Value>) -> Json<Value> {
    let mut node = node.lock().unwrap();
    let method = req["method"].as_str().unwrap_or_default().to_string();
    let params = req["params"].clone();
    node.calls.push((method.clone(), params.clone()));

    let result = match method.as_str() {
        "sui_getObject" => {
            let id = params[0].as_str().unwrap_or_default();
            match node.objects.get(id) {
                Some(data) => json!({ "data": data }),
                None => json!({ "error": { "code": "notExists", "object_id": id } }),
            }
        }
        "suix_getDynamicFieldObject" => {
            let parent = params[0].as_str().unwrap_or_default().to_string();
            let key = params[1]["type"].as_str().unwrap_or_default().to_string();
            match node.dynamic_fields.get(&(parent.clone(), key)) {
                Some(data) => json!({ "data": data }),
                None => json!({ "error": { "code": "dynamicFieldNotFound", "parent_object_id": parent } }),
            }
        }
        "suix_getOwnedObjects" => {
            let owner = params[0].as_str().unwrap_or_default().to_string();
            let struct_type = params[1]["filter"]["StructType"].as_str().unwrap_or_default().to_string();
            let data = node.owned.get(&(owner, struct_type)).cloned().unwrap_or_default();
            json!({ "data": data, "hasNextPage": false, "nextCursor": null })
        }
        "unsafe_moveCall" if node.reject_move_call => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": req["id"],
                "error": { "code": -32602, "message": "No function was found" },
            }));
        }
        "unsafe_moveCall" => json!({ "txBytes": "AAEC" }),
        "sui_executeTransactionBlock" => {
            let status = if node.failed_status {
                json!({ "status": "failure", "error": "MoveAbort(arena_pvp, 3)" })
            } else {
                json!({ "status": "success" })
            };
            json!({
                "digest": "D1",
                "effects": { "status": status },
                "events": node.tx_events,
                "objectChanges": node.created,
            })
        }
        "suix_getCoins" => json!({
            "data": [{ "coinObjectId": "0xc1" }, { "coinObjectId": "0xc2" }],
            "hasNextPage": false,
        }),
        "suix_queryEvents" if params[3] == json!(true) => json!({
            "data": [],
            "nextCursor": { "txDigest": "C0", "eventSeq": "0" },
        }),
        "suix_queryEvents" => {
            let data: Vec<Value> = node.pending_events.drain(..).collect();
            json!({ "data": data, "nextCursor": { "txDigest": "C1", "eventSeq": "0" } })
        }
        _ => json!(null),
    };

    Json(json!({ "jsonrpc": "2.0", "id": req["id"], "result": result }))
}

async fn faucet(State(node): State<Shared>, Json(req): Json<Value>) -> Json<Value> {
    let recipient = req
        .pointer("/FixedAmountRequest/recipient")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    node.lock().unwrap().faucet_requests.push(recipient);
    Json(json!({ "transferredGasObjects": [], "error": null }))
}

async fn spawn_node(node: Shared) -> String {
    let app = Router::new()
        .route("/", post(rpc))
        .route("/gas", post(faucet))
        .with_state(node);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

struct StaticSigner;

impl Signer for StaticSigner {
    fn address(&self) -> &str {
        ALICE
    }

    async fn sign(&self, tx_bytes: &str) -> Result<String, ClientError> {
        Ok(format!("sig:{}", tx_bytes))
    }
}

fn ledger(url: &str) -> SuiLedger<StaticSigner> {
    let config = ClientConfig {
        rpc_url: url.to_string(),
        faucet_url: url.to_string(),
        package_id: PACKAGE.to_string(),
        address: ALICE.to_string(),
        event_poll_ms: 10,
        request_timeout_ms: 2_000,
        ..ClientConfig::default()
    };
    SuiLedger::new(&config, StaticSigner).unwrap()
}

fn arena_ref() -> ArenaRef {
    ArenaRef { object_id: ARENA.to_string(), initial_shared_version: 5 }
}

fn bot_arena_object() -> Value {
    let stats = |hp: &str| json!({
        "type": format!("{}::arena::Stats", PACKAGE),
        "fields": { "hp": hp, "attack": "12", "defense": "7", "level": "3", "types": [1], "moves": [0, 1, 2] }
    });
    json!({
        "objectId": ARENA,
        "version": "12",
        "owner": { "Shared": { "initial_shared_version": 5 } },
        "content": {
            "dataType": "moveObject",
            "type": format!("{}::arena::Arena", PACKAGE),
            "fields": {
                "id": { "id": ARENA },
                "player_stats": stats("8500000000"),
                "bot_stats": stats("0"),
            }
        }
    })
}

#[tokio::test]
async fn test_read_object_decodes_bot_arena() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();
    let node = Shared::default();
    node.lock().unwrap().objects.insert(ARENA.to_string(), bot_arena_object());
    let url = spawn_node(node.clone()).await;
    let ledger = ledger(&url);

    let raw = ledger.read_object(ARENA).await.unwrap();
    assert_eq!(raw.version, 12);
    assert_eq!(raw.initial_shared_version, Some(5));
    assert_eq!(raw.type_name.as_deref(), Some("0xpkg::arena::Arena"));

    let state = observer::observe(&ledger, ARENA, MatchKind::Pvb, TypeTable::Arena).await.unwrap();
    assert_eq!(state.initial_shared_version, 5);
    assert!(state.is_over);
    let player = state.player_one.unwrap();
    assert_eq!(player.hp, 8_500_000_000);
    assert_eq!(player.level, 3);
    assert_eq!(player.element, Some(capymon_core::Element::Air));
    assert_eq!(state.player_two.unwrap().hp, 0);

    let (method, params) = node.lock().unwrap().calls[0].clone();
    assert_eq!(method, "sui_getObject");
    assert_eq!(params[1]["showContent"], json!(true));
}

#[tokio::test]
async fn test_missing_object_is_not_found() {
    let url = spawn_node(Shared::default()).await;
    let err = ledger(&url).read_object("0xdead").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(ref id) if id == "0xdead"), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_node_is_transient() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = ledger(&url).read_object(ARENA).await.unwrap_err();
    assert!(err.is_transient(), "got {:?}", err);
}

#[tokio::test]
async fn test_attack_builds_signs_and_executes() {
    let node = Shared::default();
    node.lock().unwrap().tx_events = vec![json!({
        "id": { "txDigest": "D1", "eventSeq": "0" },
        "type": format!("{}::arena::HitEvent", PACKAGE),
        "transactionModule": "arena",
        "parsedJson": { "player_hp": "8500000000", "bot_hp": "6000000000" },
    })];
    let url = spawn_node(node.clone()).await;
    let ledger = ledger(&url);

    let effect = executor::attack(&ledger, PACKAGE, &arena_ref(), 2).await.unwrap();
    assert_eq!(
        effect,
        ActionEffect::Attacked { player_hp: 8_500_000_000, bot_hp: 6_000_000_000, digest: "D1".into() }
    );

    let calls = node.lock().unwrap().calls.clone();
    assert_eq!(calls.len(), 2);
    let (build, params) = &calls[0];
    assert_eq!(build, "unsafe_moveCall");
    assert_eq!(params[0], json!(ALICE));
    assert_eq!(params[1], json!(PACKAGE));
    assert_eq!(params[2], json!("arena"));
    assert_eq!(params[3], json!("attack"));
    assert_eq!(params[5], json!([ARENA, 2]));
    assert_eq!(params[7], json!("100000000"));

    let (execute, params) = &calls[1];
    assert_eq!(execute, "sui_executeTransactionBlock");
    assert_eq!(params[0], json!("AAEC"));
    assert_eq!(params[1], json!(["sig:AAEC"]));
    assert_eq!(params[3], json!("WaitForLocalExecution"));
}

#[tokio::test]
async fn test_failed_effects_are_rejections() {
    let node = Shared::default();
    node.lock().unwrap().failed_status = true;
    let url = spawn_node(node).await;

    let call = EntryCall::new(PACKAGE, "arena_pvp", "commit").arg(ARENA).bytes_arg(&[1, 2, 3]);
    let err = ledger(&url).submit_entry(&call).await.unwrap_err();
    assert!(err.is_rejection(), "got {:?}", err);
    assert!(err.to_string().contains("MoveAbort"));
}

#[tokio::test]
async fn test_rpc_error_on_build_is_rejection() {
    let node = Shared::default();
    node.lock().unwrap().reject_move_call = true;
    let url = spawn_node(node.clone()).await;

    let call = EntryCall::new(PACKAGE, "arena_pvp", "join").arg(ARENA);
    let err = ledger(&url).submit_entry(&call).await.unwrap_err();
    assert!(err.is_rejection(), "got {:?}", err);
    // Nothing was executed.
    assert_eq!(node.lock().unwrap().calls.len(), 1);
}

#[tokio::test]
async fn test_create_arena_finds_shared_object() {
    let node = Shared::default();
    {
        let mut n = node.lock().unwrap();
        n.created = vec![
            json!({
                "type": "mutated",
                "objectId": "0xgas",
                "objectType": "0x2::coin::Coin<0x2::sui::SUI>",
                "version": "40",
            }),
            json!({
                "type": "created",
                "objectId": "0xnew",
                "objectType": format!("{}::arena_pvp::Arena", PACKAGE),
                "version": "40",
                "owner": { "Shared": { "initial_shared_version": 39 } },
            }),
        ];
        n.tx_events = vec![json!({
            "id": { "txDigest": "D1", "eventSeq": "0" },
            "type": format!("{}::arena_pvp::ArenaCreated", PACKAGE),
            "transactionModule": "arena_pvp",
            "parsedJson": {
                "arena": "0xnew",
                "player_stats": { "hp": "9000000000", "attack": "11", "speed": "4", "level": "1" },
            },
        })];
    }
    let url = spawn_node(node).await;

    let created = executor::create_arena(&ledger(&url), PACKAGE, MatchKind::Pvp).await.unwrap();
    assert_eq!(created.arena.object_id, "0xnew");
    assert_eq!(created.arena.initial_shared_version, 39);
    assert_eq!(created.player.as_ref().map(|p| p.hp), Some(9_000_000_000));
    assert!(created.bot.is_none());
}

#[tokio::test]
async fn test_faucet_and_coin_count() {
    let node = Shared::default();
    let url = spawn_node(node.clone()).await;
    let ledger = ledger(&url);

    ledger.request_test_funds(ALICE).await.unwrap();
    assert_eq!(node.lock().unwrap().faucet_requests, vec![ALICE.to_string()]);
    assert_eq!(ledger.coin_count(ALICE).await.unwrap(), 2);
}

#[tokio::test]
async fn test_event_subscription_filters_by_arena() {
    let node = Shared::default();
    node.lock().unwrap().pending_events = vec![
        json!({
            "id": { "txDigest": "E1", "eventSeq": "0" },
            "type": format!("{}::arena_pvp::PlayerCommit", PACKAGE),
            "transactionModule": "arena_pvp",
            "parsedJson": { "arena": "0xother" },
        }),
        json!({
            "id": { "txDigest": "E2", "eventSeq": "0" },
            "type": format!("{}::arena_pvp::PlayerReveal", PACKAGE),
            "transactionModule": "arena_pvp",
            "parsedJson": { "arena": ARENA },
        }),
    ];
    let url = spawn_node(node).await;

    let mut rx = ledger(&url).subscribe_events(EventFilter {
        package: PACKAGE.to_string(),
        module: "arena_pvp".to_string(),
        arena_id: Some(ARENA.to_string()),
    });

    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no event delivered")
        .unwrap();
    assert_eq!(event.name(), "PlayerReveal");
    assert_eq!(event.tx_digest, "E2");
}

fn object_data(id: &str, type_name: &str, fields: Value) -> Value {
    json!({
        "objectId": id,
        "version": "3",
        "content": { "dataType": "moveObject", "type": type_name, "fields": fields },
    })
}

fn match_field(value: Value) -> Value {
    object_data("0xf1e1d", "0x2::dynamic_field::Field", json!({ "id": { "id": "0xf1e1d" }, "value": value }))
}

#[tokio::test]
async fn test_kiosk_lookups() {
    let node = Shared::default();
    {
        let mut n = node.lock().unwrap();
        n.owned.insert(
            (ALICE.to_string(), kiosk::KIOSK_CAP_TYPE.to_string()),
            vec![json!({ "data": object_data("0xcap", kiosk::KIOSK_CAP_TYPE, json!({ "for": "0xk1" })) })],
        );
        n.dynamic_fields.insert(
            ("0xk1".to_string(), kiosk::extension_key(PACKAGE)),
            object_data("0xext", "0x2::dynamic_field::Field", json!({
                "value": { "fields": {
                    "is_enabled": true,
                    "permissions": "0",
                    "storage": { "fields": { "id": { "id": "0x5703" }, "size": "0" } },
                }},
            })),
        );
    }
    let url = spawn_node(node.clone()).await;
    let ledger = ledger(&url);

    let owned = kiosk::owned_kiosk(&ledger, ALICE).await.unwrap().unwrap();
    assert_eq!(owned, OwnedKiosk { kiosk_id: "0xk1".into(), cap_id: "0xcap".into() });
    assert!(kiosk::owned_kiosk(&ledger, "0xb2").await.unwrap().is_none());

    let storage = kiosk::extension_storage(&ledger, PACKAGE, "0xk1").await.unwrap();
    assert_eq!(storage.as_deref(), Some("0x5703"));
    assert!(kiosk::extension_storage(&ledger, PACKAGE, "0xk9").await.unwrap().is_none());

    assert!(!kiosk::has_player(&ledger, PACKAGE, "0x5703").await.unwrap());
    assert_eq!(kiosk::match_status(&ledger, PACKAGE, "0x5703").await.unwrap(), MatchStatus::Idle);

    let (method, params) = node.lock().unwrap().calls[2].clone();
    assert_eq!(method, "suix_getDynamicFieldObject");
    assert_eq!(params[1]["value"], json!({ "dummy_field": false }));
}

#[tokio::test]
async fn test_match_status_variants() {
    let node = Shared::default();
    let key = kiosk::match_key(PACKAGE);
    {
        let mut n = node.lock().unwrap();
        n.dynamic_fields.insert(
            ("0xsearching".to_string(), key.clone()),
            match_field(json!({ "type": "0xpkg::pool::Order", "fields": { "kiosk": "0xk1" } })),
        );
        n.dynamic_fields.insert(("0xguest".to_string(), key.clone()), match_field(json!("0xk9")));
        n.dynamic_fields.insert(
            ("0xhost".to_string(), key),
            match_field(json!({ "type": "0xpkg::the_game::Battle", "fields": { "p1": null, "p2": null } })),
        );
    }
    let url = spawn_node(node).await;
    let ledger = ledger(&url);

    assert_eq!(kiosk::match_status(&ledger, PACKAGE, "0xsearching").await.unwrap(), MatchStatus::Searching);
    assert_eq!(
        kiosk::match_status(&ledger, PACKAGE, "0xguest").await.unwrap(),
        MatchStatus::Guest { host_kiosk: "0xk9".into() }
    );
    assert_eq!(kiosk::match_status(&ledger, PACKAGE, "0xhost").await.unwrap(), MatchStatus::Host);
}

#[tokio::test]
async fn test_invite_is_found_in_kiosk() {
    let node = Shared::default();
    node.lock().unwrap().owned.insert(
        ("0xk2".to_string(), kiosk::invite_type(PACKAGE)),
        vec![json!({ "data": object_data("0x1417e", &kiosk::invite_type(PACKAGE), json!({ "kiosk": "0xk1" })) })],
    );
    let url = spawn_node(node).await;
    let ledger = ledger(&url);

    let invite = kiosk::pending_invite(&ledger, PACKAGE, "0xk2").await.unwrap().unwrap();
    assert_eq!(invite.invite_id, "0x1417e");
    assert_eq!(invite.host_kiosk, "0xk1");
    assert!(kiosk::pending_invite(&ledger, PACKAGE, "0xk1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_kiosk_commit_and_reveal_go_to_host() {
    let node = Shared::default();
    let url = spawn_node(node.clone()).await;
    let ledger = ledger(&url);
    let battle = KioskMatch {
        host_kiosk: "0xk1".into(),
        storage_id: "0x5703".into(),
        kiosk_id: "0xk2".into(),
        cap_id: "0xcap2".into(),
    };
    let commitment = Commitment::with_salt("0xk1", 3, vec![1, 2, 3, 4], Some(0));

    executor::commit(&ledger, &MemoryStore::new(), PACKAGE, Target::Kiosk(&battle), &commitment).await.unwrap();
    executor::reveal(&ledger, PACKAGE, Target::Kiosk(&battle), &commitment).await.unwrap();

    let calls = node.lock().unwrap().calls.clone();
    let builds: Vec<&Value> = calls.iter().filter(|(m, _)| m == "unsafe_moveCall").map(|(_, p)| p).collect();
    assert_eq!(builds[0][2], json!("the_game"));
    assert_eq!(builds[0][3], json!("commit"));
    assert_eq!(builds[0][5], json!(["0xk1", "0xcap2", commitment.hash.clone(), "0x6"]));
    assert_eq!(builds[1][3], json!("reveal"));
    assert_eq!(builds[1][5], json!(["0xk1", "0xcap2", 3, [1, 2, 3, 4], "0x6"]));
}

#[tokio::test]
async fn test_create_kiosk_reads_created_objects() {
    let node = Shared::default();
    node.lock().unwrap().created = vec![
        json!({
            "type": "created",
            "objectId": "0xk1",
            "objectType": "0x2::kiosk::Kiosk",
            "version": "8",
            "owner": { "Shared": { "initial_shared_version": 8 } },
        }),
        json!({
            "type": "created",
            "objectId": "0xcap",
            "objectType": "0x2::kiosk::KioskOwnerCap",
            "version": "8",
            "owner": { "AddressOwner": ALICE },
        }),
    ];
    let url = spawn_node(node.clone()).await;
    let ledger = ledger(&url);

    let owned = executor::create_kiosk(&ledger).await.unwrap();
    assert_eq!(owned, OwnedKiosk { kiosk_id: "0xk1".into(), cap_id: "0xcap".into() });
    executor::install(&ledger, PACKAGE, &owned).await.unwrap();

    let calls = node.lock().unwrap().calls.clone();
    assert_eq!(calls[0].1[1], json!("0x2"));
    assert_eq!(calls[0].1[3], json!("default"));
    assert_eq!(calls[2].1[3], json!("install"));
    assert_eq!(calls[2].1[5], json!(["0xk1", "0xcap"]));
}
