// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn expired_wins_over_everything_else() {
    let picked = resolve(&[TargetTransition::Patch, TargetTransition::Open, TargetTransition::Expired, TargetTransition::Closed]);
    assert_eq!(picked, Some(TargetTransition::Expired));
}

#[test]
fn closed_wins_over_open_and_patch() {
    let picked = resolve(&[TargetTransition::Open, TargetTransition::Closed, TargetTransition::Patch]);
    assert_eq!(picked, Some(TargetTransition::Closed));
}

#[test]
fn open_wins_over_patch() {
    let picked = resolve(&[TargetTransition::Patch, TargetTransition::Open]);
    assert_eq!(picked, Some(TargetTransition::Open));
}

#[test]
fn nothing_fired_yields_none() {
    assert_eq!(resolve(&[]), None);
}
