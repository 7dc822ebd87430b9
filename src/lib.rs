// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod bootstrap;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod db;
pub mod derived;
pub mod document;
pub mod error;
pub mod identity;
pub mod listener;
pub mod models;
pub mod remote;
pub mod signal;
pub mod store;
pub mod utils;

pub use error::{Result, SyncError};
pub use store::{LiveStore, Phase, Stores, SyncContext};
