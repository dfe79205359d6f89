// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Interactive move picker for `play --choose prompt`.

use capymon_client::chooser::{MoveChoice, MoveChooser};
use capymon_client::ClientError;
use capymon_core::catalog::GameMove;
use capymon_core::types::format_hp;
use std::io::{BufRead, Write};

/// Accepts a key hint (`q`), a wire value (`2`) or a move name (`water`).
pub fn parse_choice(input: &str, moves: &[&GameMove]) -> Option<u8> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let mut chars = input.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(m) = moves.iter().find(|m| m.key.eq_ignore_ascii_case(&c)) {
            return Some(m.value);
        }
    }
    if let Ok(v) = input.parse::<u8>() {
        return moves.iter().find(|m| m.value == v).map(|m| m.value);
    }
    moves
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(input))
        .map(|m| m.value)
}

#[derive(Debug, Default)]
pub struct PromptChooser;

impl MoveChooser for PromptChooser {
    async fn choose(&mut self, choice: MoveChoice<'_>) -> Result<u8, ClientError> {
        println!(
            "\nRound {}: you {} hp, opponent {} hp",
            choice.round,
            format_hp(choice.me.hp),
            format_hp(choice.opponent.hp)
        );
        for m in &choice.moves {
            match m.power {
                Some(power) => println!("  [{}] {} ({}, power {})", m.key, m.name, m.element, power),
                None => println!("  [{}] {} ({})", m.key, m.name, m.element),
            }
        }

        let moves = choice.moves.clone();
        loop {
            print!("Move: ");
            let _ = std::io::stdout().flush();

            let line = tokio::task::spawn_blocking(|| {
                let mut line = String::new();
                std::io::stdin().lock().read_line(&mut line).map(|n| (n, line))
            })
            .await
            .map_err(|e| ClientError::Chooser(e.to_string()))?
            .map_err(|e| ClientError::Chooser(e.to_string()))?;

            match line {
                (0, _) => return Err(ClientError::Chooser("stdin closed".into())),
                (_, text) => match parse_choice(&text, &moves) {
                    Some(v) => return Ok(v),
                    None => println!("Unknown move {:?}", text.trim()),
                },
            }
        }
    }
}
