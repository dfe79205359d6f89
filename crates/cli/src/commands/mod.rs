// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod arena;
pub mod battle;
pub mod faucet;
pub mod init;
pub mod inspect;
pub mod pending;
pub mod play;
pub mod player;
