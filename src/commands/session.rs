// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::{IdentityChannel, LocalIdentityChannel};
use crate::models::Identity;
use anyhow::{Context, Result};

pub fn login(channel: &LocalIdentityChannel, sub: &clap::ArgMatches) -> Result<()> {
    let uid = sub
        .get_one::<String>("uid")
        .context("missing uid")?
        .trim()
        .to_string();
    if uid.is_empty() || uid.contains('/') {
        anyhow::bail!("Invalid user id '{}'", uid);
    }
    let mut identity = Identity::new(&uid);
    if let Some(email) = sub.get_one::<String>("email") {
        identity = identity.with_email(email);
    }
    channel.sign_in(identity)?;
    println!("Signed in as {}", uid);
    Ok(())
}

pub fn logout(channel: &LocalIdentityChannel) -> Result<()> {
    channel.sign_out()?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(channel: &dyn IdentityChannel) {
    match channel.current() {
        Some(Identity {
            uid,
            email: Some(email),
        }) => println!("{} <{}>", uid, email),
        Some(identity) => println!("{}", identity.uid),
        None => println!("Not signed in"),
    }
}
