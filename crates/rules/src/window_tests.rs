// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn evicts_observations_older_than_the_window() {
    let mut w = RollingWindow::new(100);
    w.push(Observation::new(0, 1.0));
    w.push(Observation::new(50, 2.0));
    w.push(Observation::new(150, 3.0));
    assert_eq!(w.len(), 2);
    assert_eq!(w.first(), Some(Observation::new(50, 2.0)));
}

#[test]
fn zero_window_never_evicts() {
    let mut w = RollingWindow::new(0);
    for i in 0..10 {
        w.push(Observation::new(i * 1_000, i as f64));
    }
    assert_eq!(w.len(), 10);
}

#[test]
fn last_and_clear_work() {
    let mut w = RollingWindow::new(0);
    assert_eq!(w.last(), None);
    w.push(Observation::new(1, 9.0));
    assert_eq!(w.last(), Some(Observation::new(1, 9.0)));
    w.clear();
    assert!(w.is_empty());
}
