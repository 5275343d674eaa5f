use glam::Vec3;
use interaction_arbiter::{
    Actor, Collider, ColliderKind, GroupError, GroupMember, InputSample, Interactable,
    InteractionManager, SphereOverlapProbe,
};

fn manager_with_target() -> InteractionManager {
    let mut manager = InteractionManager::new();
    manager
        .registry_mut()
        .register_interactable(Interactable::new(10, Vec3::ZERO));
    manager.registry_mut().register_collider(
        Collider::sphere(1, Vec3::ZERO, 0.5),
        10,
        ColliderKind::Surface,
    );
    manager
}

fn near_actor(id: u64) -> Actor {
    let mut actor = Actor::new(id);
    actor
        .resolver_mut()
        .set_near_probe(Box::new(SphereOverlapProbe::new(Vec3::ZERO, 0.2)));
    actor
}

fn grouped_pair(manager: &mut InteractionManager) {
    manager.register_group(100);
    manager.register_actor(near_actor(1));
    manager.register_actor(near_actor(2));
    manager.tick(0.016);
    manager
        .add_group_member(100, GroupMember::Actor(1))
        .expect("Aufnahme erwartet");
    manager
        .add_group_member(100, GroupMember::Actor(2))
        .expect("Aufnahme erwartet");
}

#[test]
fn test_group_enforces_mutual_exclusion_over_hover() {
    let mut manager = manager_with_target();
    grouped_pair(&mut manager);

    manager.tick(0.016);

    // Beide Probes überlappen das Ziel, aber nur Mitglied 1 darf hovern.
    assert!(manager.actor(1).expect("Actor erwartet").hovered().contains(&10));
    assert!(manager.actor(2).expect("Actor erwartet").hovered().is_empty());
    assert_eq!(
        manager.group(100).expect("Group erwartet").active_interactor(),
        Some(1)
    );
}

#[test]
fn test_low_priority_winner_stays_sticky_while_holding() {
    let mut manager = manager_with_target();
    grouped_pair(&mut manager);

    // Mitglied 1 ist außer Reichweite, Mitglied 2 selektiert.
    manager
        .actor_mut(1)
        .expect("Actor erwartet")
        .resolver_mut()
        .set_probe_pose(Vec3::new(10.0, 0.0, 0.0), Vec3::X);
    manager
        .actor_mut(2)
        .expect("Actor erwartet")
        .set_select_sample(InputSample::press());
    manager.tick(0.016);
    assert!(manager.actor(2).expect("Actor erwartet").has_selection());

    // Mitglied 1 kommt zurück: solange 2 hält, bleibt 2 der Sieger.
    manager
        .actor_mut(1)
        .expect("Actor erwartet")
        .resolver_mut()
        .set_probe_pose(Vec3::ZERO, Vec3::X);
    manager
        .actor_mut(2)
        .expect("Actor erwartet")
        .set_select_sample(InputSample::hold());
    manager.tick(0.016);

    assert!(manager.actor(2).expect("Actor erwartet").has_selection());
    assert!(manager.actor(1).expect("Actor erwartet").hovered().is_empty());

    // Release: die Kontrolle fällt an das höher priorisierte Mitglied zurück.
    manager
        .actor_mut(2)
        .expect("Actor erwartet")
        .set_select_sample(InputSample::release());
    manager.tick(0.016);

    assert!(!manager.actor(2).expect("Actor erwartet").has_selection());
    assert!(manager.actor(1).expect("Actor erwartet").hovered().contains(&10));
    assert_eq!(
        manager.group(100).expect("Group erwartet").active_interactor(),
        Some(1)
    );
}

#[test]
fn test_nested_subgroup_is_suppressed_by_parent_winner() {
    let mut manager = manager_with_target();
    manager.register_group(100);
    manager.register_group(200);
    manager.register_actor(near_actor(1));
    manager.register_actor(near_actor(2));
    manager.tick(0.016);

    manager
        .add_group_member(100, GroupMember::Actor(1))
        .expect("Aufnahme erwartet");
    manager
        .add_group_member(100, GroupMember::Group(200))
        .expect("Aufnahme erwartet");
    manager
        .add_group_member(200, GroupMember::Actor(2))
        .expect("Aufnahme erwartet");

    manager.tick(0.016);

    assert!(manager.actor(1).expect("Actor erwartet").hovered().contains(&10));
    assert!(manager.actor(2).expect("Actor erwartet").hovered().is_empty());
    assert_eq!(
        manager.group(200).expect("Group erwartet").active_interactor(),
        None
    );
}

#[test]
fn test_cycle_rejection_leaves_membership_unchanged() {
    let mut manager = InteractionManager::new();
    manager.register_group(100);
    manager.register_group(200);
    manager.register_group(300);
    manager.tick(0.016);

    manager
        .add_group_member(100, GroupMember::Group(200))
        .expect("Aufnahme erwartet");
    manager
        .add_group_member(200, GroupMember::Group(300))
        .expect("Aufnahme erwartet");

    // 300 enthält (transitiv) keine der beiden — aber 100 in 300 schlösse
    // den Kreis.
    assert_eq!(
        manager.add_group_member(300, GroupMember::Group(100)),
        Err(GroupError::CyclicMembership)
    );
    assert_eq!(
        manager.group(300).expect("Group erwartet").members(),
        &[] as &[GroupMember]
    );
    assert_eq!(
        manager.group(100).expect("Group erwartet").members(),
        &[GroupMember::Group(200)]
    );
}

#[test]
fn test_dual_ownership_is_rejected() {
    let mut manager = manager_with_target();
    manager.register_group(100);
    manager.register_group(200);
    manager.register_actor(near_actor(1));
    manager.tick(0.016);

    manager
        .add_group_member(100, GroupMember::Actor(1))
        .expect("Aufnahme erwartet");
    assert_eq!(
        manager.add_group_member(200, GroupMember::Actor(1)),
        Err(GroupError::AlreadyMember(100))
    );
}

#[test]
fn test_reorder_changes_arbitration_priority() {
    let mut manager = manager_with_target();
    grouped_pair(&mut manager);
    manager.tick(0.016);
    assert_eq!(
        manager.group(100).expect("Group erwartet").active_interactor(),
        Some(1)
    );

    manager
        .reorder_group_member(100, GroupMember::Actor(2), 0)
        .expect("Verschieben erwartet");
    manager.tick(0.016);

    assert_eq!(
        manager.group(100).expect("Group erwartet").active_interactor(),
        Some(2)
    );
    assert!(manager.actor(1).expect("Actor erwartet").hovered().is_empty());
}
