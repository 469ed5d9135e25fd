//! End-to-end behavior engine scenarios.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use disha_nav::behavior::script::Value;
use disha_nav::{BehaviorEngine, FlowConfig};
use smriti_map::{Bearing, Point2, RobotStatus, WorldModel, WorldModelConfig};

fn world() -> WorldModel {
    WorldModel::new(WorldModelConfig::default()).unwrap()
}

fn engine(source: &str) -> BehaviorEngine {
    BehaviorEngine::new(FlowConfig::from_toml(source).unwrap().build().unwrap())
}

fn status_at(time: u64) -> RobotStatus {
    RobotStatus::new(time)
}

const PATROL_FLOW: &str = r#"
    entry = "park"
    on_init = "0 bumps put"

    [states.park]
    kind = "halt"
    timeout = 2000

    [states.explore]
    kind = "exploring"

    [states.avoid]
    kind = "avoiding"

    [[transitions]]
    from = "park"
    trigger = "timeout"
    to = "explore"

    [[transitions]]
    from = "explore"
    trigger = "frontBlocked"
    to = "avoid"
    on_transition = "bumps get 1 add bumps put"

    [[transitions]]
    from = "explore"
    trigger = "blocked"
    to = "park"

    [[transitions]]
    from = "avoid"
    trigger = "completed"
    to = "explore"
"#;

#[test]
fn test_timeout_keeps_flow_live() {
    let mut world = world();
    let mut engine = engine(PATROL_FLOW);

    world.update(status_at(0), None);
    let commands = engine.step(&mut world).unwrap();
    assert!(commands.halt);
    assert_eq!(engine.current_state(), "park");

    // Nothing happens to the robot, but the timeout still fires
    world.update(status_at(2500), None);
    engine.step(&mut world);
    assert_eq!(engine.current_state(), "explore");

    world.update(status_at(2600), None);
    let commands = engine.step(&mut world).unwrap();
    assert!(commands.movement.is_some());
}

#[test]
fn test_contact_cycle_counts_bumps() {
    let mut world = world();
    let mut engine = engine(PATROL_FLOW);

    world.update(status_at(0), None);
    engine.step(&mut world);
    world.update(status_at(2500), None);
    engine.step(&mut world);
    assert_eq!(engine.current_state(), "explore");

    for round in 0..2u64 {
        // Front bumper hit while exploring
        let mut status = status_at(3000 + round * 1000);
        status.can_move_forward = false;
        world.update(status, None);
        engine.step(&mut world);
        assert_eq!(engine.current_state(), "avoid");

        // Contact released, the avoider is satisfied and hands back
        world.update(status_at(3500 + round * 1000), None);
        engine.step(&mut world);
        assert_eq!(engine.current_state(), "explore");
    }
    assert_eq!(engine.context().vars["bumps"], Value::Num(2.0));
}

#[test]
fn test_both_contacts_always_block() {
    // Whatever the pose, a robot pinched at both ends reports blocked
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..20 {
        let mut world = world();
        let mut engine = engine(
            r#"
            entry = "explore"

            [states.explore]
            kind = "exploring"

            [states.stuck]
            kind = "halt"

            [[transitions]]
            from = "explore"
            trigger = "blocked"
            to = "stuck"
        "#,
        );
        let mut status = status_at(1000);
        status.location = Point2::new(rng.gen_range(-1.5..1.5), rng.gen_range(-1.5..1.5));
        status.direction = Bearing::from_deg(rng.gen_range(-180.0..180.0));
        status.can_move_forward = false;
        status.can_move_backward = false;
        world.update(status, None);

        let commands = engine.step(&mut world).unwrap();
        assert!(commands.halt);
        assert_eq!(engine.current_state(), "stuck");
    }
}

#[test]
fn test_clear_map_resets_radar() {
    let mut world = world();
    // Leave some evidence on the map
    let mut status = status_at(1000);
    status.echo.time = 1000;
    status.echo.distance = 1.0;
    world.update(status, None);
    assert!(world.radar().cells().iter().any(|cell| !cell.unknown()));

    let mut engine = engine(
        r#"
        entry = "reset"

        [states.reset]
        kind = "clearMap"

        [states.park]
        kind = "halt"

        [[transitions]]
        from = "reset"
        trigger = "completed"
        to = "park"
    "#,
    );
    world.update(status_at(2000), None);
    engine.step(&mut world);
    assert!(world.radar().cells().iter().all(|cell| cell.unknown()));
    assert_eq!(engine.current_state(), "park");
}

#[test]
fn test_unrouted_exit_is_ignored() {
    let mut world = world();
    let mut engine = engine(
        r#"
        entry = "park"

        [states.park]
        kind = "halt"
        timeout = 100
    "#,
    );
    world.update(status_at(0), None);
    engine.step(&mut world);
    // Timeout fires but routes nowhere; the state simply stays active
    world.update(status_at(200), None);
    engine.step(&mut world);
    assert_eq!(engine.current_state(), "park");
    world.update(status_at(300), None);
    let commands = engine.step(&mut world).unwrap();
    assert!(commands.halt);
}
