//! Integration tests for gob trees and event dispatch.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use proptest::prelude::*;
use warren_engine::{event, Gob, Step, TickCtx};
use warren_foundation::GobId;

/// Whether a tree contains a gob with this id.
fn contains_gob(root: &Gob, id: GobId) -> bool {
    root.id() == id || root.children().iter().any(|c| contains_gob(c, id))
}

/// Finds a gob anywhere in a tree by id.
fn find_mut(root: &mut Gob, id: GobId) -> Option<&mut Gob> {
    if root.id() == id {
        return Some(root);
    }
    let branch = root.children().iter().find(|c| contains_gob(c, id))?.id();
    find_mut(root.child_mut(branch)?, id)
}

fn recording_gob(log: &Rc<RefCell<Vec<GobId>>>) -> Gob {
    let mut gob = Gob::new(0.0, 0.0, 0.0);
    let log = Rc::clone(log);
    gob.add_event_step(event::UPDATE, Step::new(move |g, _| log.borrow_mut().push(g.id())));
    gob
}

#[test]
fn deep_trees_dispatch_self_before_children() {
    let log = Rc::new(RefCell::new(Vec::new()));

    // root -> (a -> (b, c), d)
    let mut root = recording_gob(&log);
    let mut a = recording_gob(&log);
    let b = recording_gob(&log);
    let c = recording_gob(&log);
    let d = recording_gob(&log);

    let (a_id, b_id, c_id, d_id) = (a.id(), b.id(), c.id(), d.id());
    a.add_child(b);
    a.add_child(c);
    root.add_child(a);
    root.add_child(d);

    let mut queue = Vec::new();
    let mut ctx = TickCtx::detached(&mut queue);
    root.fire_event(event::UPDATE, &mut ctx);

    assert_eq!(*log.borrow(), vec![root.id(), a_id, b_id, c_id, d_id]);
}

#[test]
fn moving_a_subtree_moves_all_of_it() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut left = recording_gob(&log);
    let mut right = recording_gob(&log);

    let mut carried = recording_gob(&log);
    let passenger = recording_gob(&log);
    let passenger_id = passenger.id();
    carried.add_child(passenger);
    let carried_id = left.add_child(carried);

    let subtree = left.remove_child(carried_id).unwrap();
    right.add_child(subtree);

    log.borrow_mut().clear();
    let mut queue = Vec::new();
    let mut ctx = TickCtx::detached(&mut queue);
    left.fire_event(event::UPDATE, &mut ctx);
    assert_eq!(log.borrow().len(), 1, "only the left root remains");

    log.borrow_mut().clear();
    right.fire_event(event::UPDATE, &mut ctx);
    assert_eq!(*log.borrow(), vec![right.id(), carried_id, passenger_id]);
}

proptest! {
    /// For any tree shape, one `fire_event` visits every gob exactly
    /// once, and always after its parent.
    #[test]
    fn dispatch_visits_each_gob_once_parent_first(parents in prop::collection::vec(0usize..50, 1..50)) {
        let log = Rc::new(RefCell::new(Vec::new()));

        // Node i attaches under node `parents[i] % i` (node 0 is the
        // root), which can express every tree shape.
        let mut root = recording_gob(&log);
        let mut ids = vec![root.id()];
        let mut parent_of: HashMap<GobId, GobId> = HashMap::new();

        for (i, parent_choice) in parents.iter().enumerate() {
            let parent_id = ids[parent_choice % (i + 1)];
            let child = recording_gob(&log);
            let child_id = child.id();
            ids.push(child_id);
            parent_of.insert(child_id, parent_id);

            let parent = find_mut(&mut root, parent_id).expect("parent is in the tree");
            parent.add_child(child);
        }

        let mut queue = Vec::new();
        let mut ctx = TickCtx::detached(&mut queue);
        root.fire_event(event::UPDATE, &mut ctx);

        let visits = log.borrow();
        prop_assert_eq!(visits.len(), ids.len(), "each gob visited exactly once");
        let position: HashMap<GobId, usize> =
            visits.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        prop_assert_eq!(position.len(), visits.len(), "no duplicate visits");
        for (child, parent) in &parent_of {
            prop_assert!(position[parent] < position[child], "self before children");
        }
    }
}
