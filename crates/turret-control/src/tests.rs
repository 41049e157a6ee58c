#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;
    use glam::{DQuat, DVec3};

    use turret_core::config::{TagFilter, TurretConfig};
    use turret_core::constants::*;
    use turret_core::enums::{BehaviorState, MountKind};
    use turret_core::error::TurretError;
    use turret_core::events::TurretEvent;
    use turret_core::types::EntityId;

    use crate::acquisition::{select_nearest, Candidate, Scan, SceneQuery, TargetAcquisition};
    use crate::aim::{aim_gun, aim_head, GunMount, HeadMount, MountRig};
    use crate::fire::{request_shot, spawn_request, FireGate, ProjectileSpawnRequest};
    use crate::fire::{ProjectileHandle, ProjectileSpawner};
    use crate::fsm::evaluate;
    use crate::kinematics::KinematicsTracker;
    use crate::lead::{predict_intercept, LeadPredictor};
    use crate::math::{angle_between, horizontal, look_rotation};
    use crate::turret::{TickContext, Turret, TurretBuilder};

    // ---- Test doubles ----

    #[derive(Default)]
    struct TestScene {
        entities: Vec<(EntityId, String, DVec3)>,
    }

    impl TestScene {
        fn add(&mut self, id: u64, tag: &str, position: DVec3) -> EntityId {
            let id = EntityId(id);
            self.entities.push((id, tag.to_string(), position));
            id
        }

        fn move_to(&mut self, id: EntityId, position: DVec3) {
            for entity in self.entities.iter_mut().filter(|e| e.0 == id) {
                entity.2 = position;
            }
        }

        fn retag(&mut self, id: EntityId, tag: &str) {
            for entity in self.entities.iter_mut().filter(|e| e.0 == id) {
                entity.1 = tag.to_string();
            }
        }

        fn remove(&mut self, id: EntityId) {
            self.entities.retain(|e| e.0 != id);
        }
    }

    impl SceneQuery for TestScene {
        fn candidates(&self, filter: &TagFilter) -> Vec<Candidate> {
            self.entities
                .iter()
                .filter(|(_, tag, _)| filter.matches(tag))
                .map(|(id, _, position)| Candidate {
                    id: *id,
                    position: *position,
                })
                .collect()
        }

        fn locate(&self, id: EntityId) -> Option<DVec3> {
            self.entities
                .iter()
                .find(|(entity, _, _)| *entity == id)
                .map(|(_, _, position)| *position)
        }
    }

    #[derive(Default)]
    struct RecordingSpawner {
        requests: Vec<ProjectileSpawnRequest>,
    }

    impl ProjectileSpawner for RecordingSpawner {
        fn spawn(&mut self, request: ProjectileSpawnRequest) -> ProjectileHandle {
            self.requests.push(request);
            EntityId(1000 + self.requests.len() as u64)
        }
    }

    fn ctx(tick: u64) -> TickContext {
        TickContext {
            now: tick as f64 * DT,
            dt: DT,
            position: DVec3::ZERO,
        }
    }

    fn build(config: TurretConfig) -> Turret {
        TurretBuilder::new(config)
            .head(HeadMount::default())
            .gun(GunMount::default())
            .build()
            .unwrap()
    }

    fn candidate(id: u64, position: DVec3) -> Candidate {
        Candidate {
            id: EntityId(id),
            position,
        }
    }

    // ---- Acquisition ----

    #[test]
    fn test_selects_nearest_within_radius() {
        // Squared distances 4, 9, 1, 25 against a squared radius of 16.
        let candidates = [
            candidate(1, DVec3::new(2.0, 0.0, 0.0)),
            candidate(2, DVec3::new(0.0, 3.0, 0.0)),
            candidate(3, DVec3::new(0.0, 0.0, 1.0)),
            candidate(4, DVec3::new(-5.0, 0.0, 0.0)),
        ];
        let chosen = select_nearest(DVec3::ZERO, &candidates, 16.0).unwrap();
        assert_eq!(chosen.id, EntityId(3));
    }

    #[test]
    fn test_no_candidate_in_range() {
        let far = [
            candidate(1, DVec3::new(20.0, 0.0, 0.0)),
            candidate(2, DVec3::new(0.0, -11.0, 0.0)),
        ];
        assert!(select_nearest(DVec3::ZERO, &far, 100.0).is_none());
        assert!(select_nearest(DVec3::ZERO, &[], 100.0).is_none());
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let edge = [candidate(9, DVec3::new(0.0, 10.0, 0.0))];
        assert_eq!(
            select_nearest(DVec3::ZERO, &edge, 100.0).map(|c| c.id),
            Some(EntityId(9))
        );
    }

    #[test]
    fn test_acquisition_cadence() {
        let config = TurretConfig {
            search_interval: 0.5,
            ..Default::default()
        };
        let mut scene = TestScene::default();
        scene.add(1, "Enemy", DVec3::new(1.0, 0.0, 0.0));
        let mut acquisition = TargetAcquisition::default();

        let mut scans = Vec::new();
        for tick in 0..120u64 {
            let now = tick as f64 * DT;
            if let Scan::Completed(found) = acquisition.poll(now, DVec3::ZERO, &config, &scene) {
                assert_eq!(found.map(|c| c.id), Some(EntityId(1)));
                scans.push(tick);
            }
        }
        assert_eq!(scans, vec![0, 30, 60, 90]);
    }

    #[test]
    fn test_acquisition_respects_tag_filter() {
        let config = TurretConfig {
            enemy_tags: TagFilter::AnyOf(vec!["Drone".into(), "Tank".into()]),
            ..Default::default()
        };
        let mut scene = TestScene::default();
        scene.add(1, "Friend", DVec3::new(1.0, 0.0, 0.0));
        scene.add(2, "Tank", DVec3::new(4.0, 0.0, 0.0));
        let mut acquisition = TargetAcquisition::default();
        let scan = acquisition.poll(0.0, DVec3::ZERO, &config, &scene);
        assert_eq!(
            scan,
            Scan::Completed(Some(candidate(2, DVec3::new(4.0, 0.0, 0.0))))
        );
    }

    // ---- Kinematics ----

    #[test]
    fn test_first_tracked_tick_has_zero_velocity() {
        let mut tracker = KinematicsTracker::default();
        let id = EntityId(1);
        assert_eq!(tracker.estimate(id, DVec3::new(1.0, 1.0, 0.0), 0.0), DVec3::ZERO);
        tracker.record(id, DVec3::new(1.0, 1.0, 0.0), 0.0);

        let v = tracker.estimate(id, DVec3::new(1.0 + 2.0 * DT, 1.0, 0.0), DT);
        assert_abs_diff_eq!(v, DVec3::new(2.0, 0.0, 0.0), epsilon = 1e-9);
        assert_eq!(tracker.velocity(), v);
    }

    #[test]
    fn test_velocity_uses_time_between_samples() {
        let mut tracker = KinematicsTracker::default();
        let id = EntityId(1);
        let velocity = DVec3::new(3.0, -1.0, 0.5);

        // Tick lengths change between samples, as they do under time scaling.
        let mut now = 0.0;
        let mut position = DVec3::new(4.0, 4.0, 0.0);
        tracker.record(id, position, now);
        for dt in [DT, 2.0 * DT, 0.25 * DT, 4.0 * DT] {
            now += dt;
            position += velocity * dt;
            let v = tracker.estimate(id, position, now);
            assert_abs_diff_eq!(v, velocity, epsilon = 1e-9);
            tracker.record(id, position, now);
        }
    }

    #[test]
    fn test_target_switch_resets_velocity() {
        let mut tracker = KinematicsTracker::default();
        tracker.record(EntityId(1), DVec3::ZERO, 0.0);
        let v = tracker.estimate(EntityId(2), DVec3::new(50.0, 0.0, 0.0), DT);
        assert_eq!(v, DVec3::ZERO);
    }

    #[test]
    fn test_no_elapsed_time_does_not_divide() {
        let mut tracker = KinematicsTracker::default();
        tracker.record(EntityId(1), DVec3::ZERO, 1.0);
        assert_eq!(tracker.estimate(EntityId(1), DVec3::X, 1.0), DVec3::ZERO);
        assert_eq!(tracker.estimate(EntityId(1), DVec3::X, 0.5), DVec3::ZERO);
    }

    // ---- Lead prediction ----

    #[test]
    fn test_stationary_target_needs_no_lead() {
        let target = DVec3::new(12.0, -4.0, 3.0);
        for speed in [0.5, 10.0, 900.0] {
            let aim = predict_intercept(target, DVec3::ZERO, DVec3::new(0.0, 0.0, 1.5), speed)
                .unwrap();
            assert_eq!(aim, target);
        }
    }

    #[test]
    fn test_moving_target_converges_to_intercept() {
        let target = DVec3::new(20.0, 0.0, 0.0);
        let velocity = DVec3::new(0.0, 3.0, 0.0);
        let predictor = LeadPredictor::new(10.0).unwrap();
        let trace = predictor.trace(target, velocity, DVec3::ZERO);
        assert_eq!(trace.len(), LEAD_ITERATIONS + 1);

        // Successive corrections never grow.
        let steps: Vec<f64> = trace.windows(2).map(|w| w[0].distance(w[1])).collect();
        for pair in steps.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12, "diverging steps: {steps:?}");
        }

        // |P + V t| = s t  =>  t = 20 / sqrt(91)
        let t = 20.0 / 91.0_f64.sqrt();
        let expected = target + velocity * t;
        let aim = predictor.predict(target, velocity, DVec3::ZERO);
        assert_abs_diff_eq!(aim, expected, epsilon = 1e-3);
        assert_eq!(aim, *trace.last().unwrap());
    }

    #[test]
    fn test_lead_prediction_is_deterministic() {
        let args = (
            DVec3::new(5.0, 7.0, 2.0),
            DVec3::new(-1.5, 0.25, 0.0),
            DVec3::new(0.0, 0.0, 1.5),
        );
        let a = predict_intercept(args.0, args.1, args.2, 12.0).unwrap();
        let b = predict_intercept(args.0, args.1, args.2, 12.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lead_rejects_non_positive_speed() {
        for speed in [0.0, -3.0, f64::NAN] {
            let result = predict_intercept(DVec3::X, DVec3::Y, DVec3::ZERO, speed);
            assert!(matches!(
                result,
                Err(TurretError::InvalidConfig {
                    field: "projectile_speed",
                    ..
                })
            ));
        }
    }

    // ---- Aim controller ----

    #[test]
    fn test_head_step_is_bounded_and_constant() {
        let speed = 2.0;
        let max_step = DT * speed;
        let aims = [
            DVec3::new(10.0, 0.0, 3.0),
            DVec3::new(-4.0, -4.0, 0.0),
            DVec3::new(0.0, -10.0, -2.0),
            DVec3::new(0.1, 8.0, 0.0),
        ];
        let mut rig = MountRig::default();
        for aim in aims {
            for _ in 0..200 {
                let before = rig.head.orientation;
                let desired = look_rotation(horizontal(aim - rig.head_pivot(DVec3::ZERO))).unwrap();
                let remaining = angle_between(before, desired);

                let turned = aim_head(&mut rig, DVec3::ZERO, aim, max_step);
                let actual = angle_between(before, rig.head.orientation);

                assert!(actual <= max_step + 1e-12);
                assert_abs_diff_eq!(actual, turned, epsilon = 1e-9);
                assert_abs_diff_eq!(actual, remaining.min(max_step), epsilon = 1e-9);
            }
            // Converged and yaw-only.
            let facing = rig.head_forward();
            assert_abs_diff_eq!(facing, horizontal(aim).normalize(), epsilon = 1e-9);
            assert_abs_diff_eq!(rig.head.orientation * DVec3::Z, DVec3::Z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_head_ignores_aim_directly_overhead() {
        let mut rig = MountRig::default();
        let turned = aim_head(&mut rig, DVec3::ZERO, DVec3::new(0.0, 0.0, 30.0), 1.0);
        assert_eq!(turned, 0.0);
        assert_eq!(rig.head.orientation, DQuat::IDENTITY);
    }

    #[test]
    fn test_gun_pitch_tracks_height_only() {
        let aim = DVec3::new(0.0, 8.0, 6.0);
        let mut rig = MountRig::default();
        let pivot = rig.gun_pivot(DVec3::ZERO);
        let max_step = DT * PI;

        for _ in 0..120 {
            let before = rig.gun_orientation();
            aim_gun(&mut rig, DVec3::ZERO, aim, max_step);
            let actual = angle_between(before, rig.gun_orientation());
            assert!(actual <= max_step + 1e-12);
            // Local rotation stays about the pitch axis.
            assert_abs_diff_eq!(rig.gun.local_orientation * DVec3::X, DVec3::X, epsilon = 1e-9);
        }

        let dz = aim.z - pivot.z;
        let expected = dz.atan2(pivot.distance(aim));
        assert_abs_diff_eq!(rig.gun_pitch(), expected, epsilon = 1e-9);
        // Head never moved.
        assert_eq!(rig.head.orientation, DQuat::IDENTITY);
    }

    #[test]
    fn test_gun_rides_on_head() {
        let mut rig = MountRig {
            head: HeadMount::default().with_yaw(FRAC_PI_2),
            gun: GunMount::default().with_pitch(0.25),
        };
        // Head faces West (-X); gun keeps its elevation relative to the head.
        assert_abs_diff_eq!(rig.head_forward(), DVec3::NEG_X, epsilon = 1e-12);
        assert_abs_diff_eq!(rig.gun_pitch(), 0.25, epsilon = 1e-12);
        let forward = rig.gun_forward();
        assert!(forward.x < 0.0 && forward.z > 0.0);

        rig.gun.local_orientation = DQuat::IDENTITY;
        assert_abs_diff_eq!(rig.gun_forward(), DVec3::NEG_X, epsilon = 1e-12);
    }

    // ---- Fire controller ----

    #[test]
    fn test_fire_rate_cap() {
        let mut gate = FireGate::default();
        let mut shots = Vec::new();
        // 2 simulated seconds at 60 ticks/sec.
        for tick in 0..120u64 {
            let now = tick as f64 * DT;
            if gate.try_fire(now, 0.5) {
                shots.push(now);
            }
        }
        assert_eq!(shots.len(), 4);
        for (shot, expected) in shots.iter().zip([0.0, 0.5, 1.0, 1.5]) {
            assert_abs_diff_eq!(*shot, expected, epsilon = 1e-9);
        }
        for pair in shots.windows(2) {
            assert!(pair[1] - pair[0] >= 0.5 - 1e-9);
        }
    }

    #[test]
    fn test_fire_rate_cap_with_accumulated_clock() {
        let mut gate = FireGate::default();
        let mut now = 0.0;
        let mut count = 0;
        for _ in 0..120 {
            if gate.try_fire(now, 0.5) {
                count += 1;
            }
            now += DT;
        }
        assert_eq!(count, 4);
    }

    #[test]
    fn test_dropped_requests_are_not_queued() {
        let mut gate = FireGate::default();
        assert!(gate.try_fire(0.0, 1.0));
        for tick in 1..59u64 {
            assert!(!gate.try_fire(tick as f64 * DT, 1.0));
        }
        assert_eq!(gate.ready_at(), Some(1.0));
        // One shot once reopened, not a burst of the missed ones.
        assert!(gate.try_fire(1.0, 1.0));
        assert!(!gate.try_fire(1.0 + DT, 1.0));
    }

    #[test]
    fn test_spawn_request_aligns_projectile_with_gun() {
        let config = TurretConfig {
            projectile_forward: DVec3::Z,
            projectile_speed: 42.0,
            ..Default::default()
        };
        let rig = MountRig {
            head: HeadMount::default().with_yaw(0.7),
            gun: GunMount::default().with_pitch(0.3),
        };
        let base = DVec3::new(3.0, 4.0, 0.0);
        let request = spawn_request(&config, &rig, base);

        assert_eq!(request.position, rig.gun_pivot(base));
        assert_eq!(request.speed, 42.0);
        assert_abs_diff_eq!(request.orientation * DVec3::Z, rig.gun_forward(), epsilon = 1e-9);
        assert_abs_diff_eq!(request.velocity(), rig.gun_forward() * 42.0, epsilon = 1e-9);
    }

    #[test]
    fn test_request_shot_uses_spawner_once() {
        let config = TurretConfig::default();
        let rig = MountRig::default();
        let mut gate = FireGate::default();
        let mut spawner = RecordingSpawner::default();

        let first = request_shot(&mut gate, 0.0, &config, &rig, DVec3::ZERO, &mut spawner);
        let second = request_shot(&mut gate, DT, &config, &rig, DVec3::ZERO, &mut spawner);
        assert_eq!(first, Some(EntityId(1001)));
        assert_eq!(second, None);
        assert_eq!(spawner.requests.len(), 1);
    }

    // ---- State machine ----

    #[test]
    fn test_fsm_transitions() {
        let t = evaluate(BehaviorState::Idle, true);
        assert_eq!(t.next, BehaviorState::Attack);
        assert!(t.changed);

        let t = evaluate(BehaviorState::Attack, false);
        assert_eq!(t.next, BehaviorState::Idle);
        assert!(t.changed);
    }

    #[test]
    fn test_fsm_idempotent() {
        let t = evaluate(BehaviorState::Attack, true);
        assert_eq!(t.next, BehaviorState::Attack);
        assert!(!t.changed);

        let t = evaluate(BehaviorState::Idle, false);
        assert_eq!(t.next, BehaviorState::Idle);
        assert!(!t.changed);
    }

    // ---- Construction ----

    #[test]
    fn test_builder_requires_both_mounts() {
        let no_head = TurretBuilder::new(TurretConfig::default())
            .gun(GunMount::default())
            .build();
        assert_eq!(no_head.unwrap_err(), TurretError::MissingMount(MountKind::Head));

        let no_gun = TurretBuilder::new(TurretConfig::default())
            .head(HeadMount::default())
            .build();
        assert_eq!(no_gun.unwrap_err(), TurretError::MissingMount(MountKind::Gun));
    }

    #[test]
    fn test_builder_rejects_bad_projectile_speed() {
        let result = Turret::builder(TurretConfig {
            projectile_speed: 0.0,
            ..Default::default()
        })
        .head(HeadMount::default())
        .gun(GunMount::default())
        .build();
        assert!(matches!(
            result,
            Err(TurretError::InvalidConfig {
                field: "projectile_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_config_reads_back_unchanged() {
        let config = TurretConfig {
            vision_radius: 22.0,
            rotation_speed: 1.25,
            fire_rate: 0.4,
            projectile_speed: 55.0,
            enemy_tags: TagFilter::exact("Walker"),
            search_interval: 0.75,
            projectile_forward: DVec3::X,
            idle_scan_rate: 0.0,
        };
        let turret = build(config.clone());
        assert_eq!(turret.config(), &config);
        assert_eq!(turret.state(), BehaviorState::Idle);
        assert_eq!(turret.target(), None);
        assert_eq!(turret.targeting_position(), None);
        assert!(turret.allow_fire(0.0));
    }

    // ---- Turret behavior ----

    #[test]
    fn test_engages_the_tick_after_acquisition() {
        let mut scene = TestScene::default();
        let enemy = scene.add(1, "Enemy", DVec3::new(5.0, 5.0, 0.0));
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig::default());

        let report = turret.tick(&ctx(0), &scene, &mut spawner);
        assert_eq!(turret.state(), BehaviorState::Idle);
        assert_eq!(turret.target(), Some(enemy));
        assert!(matches!(
            report.events.as_slice(),
            [TurretEvent::TargetAcquired { target, .. }] if *target == enemy
        ));
        assert!(report.shots.is_empty());

        let report = turret.tick(&ctx(1), &scene, &mut spawner);
        assert_eq!(turret.state(), BehaviorState::Attack);
        assert_eq!(report.events[0], TurretEvent::Engaged { target: enemy });
        assert_eq!(report.shots.len(), 1);
        assert_eq!(turret.targeting_position(), Some(DVec3::new(5.0, 5.0, 0.0)));

        // Holding the same target never re-runs entry.
        let mut engaged = 0;
        for tick in 2..300 {
            let report = turret.tick(&ctx(tick), &scene, &mut spawner);
            engaged += report
                .events
                .iter()
                .filter(|e| matches!(e, TurretEvent::Engaged { .. }))
                .count();
        }
        assert_eq!(engaged, 0);
        assert_eq!(turret.state(), BehaviorState::Attack);
    }

    #[test]
    fn test_turret_fire_cadence() {
        let mut scene = TestScene::default();
        scene.add(1, "Enemy", DVec3::new(0.0, 6.0, 0.0));
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig {
            fire_rate: 0.5,
            ..Default::default()
        });

        let mut shot_ticks = Vec::new();
        for tick in 0..121 {
            if !turret.tick(&ctx(tick), &scene, &mut spawner).shots.is_empty() {
                shot_ticks.push(tick);
            }
        }
        // Engaged from tick 1, then one shot per 30 ticks.
        assert_eq!(shot_ticks, vec![1, 31, 61, 91]);
        assert_eq!(spawner.requests.len(), 4);
    }

    #[test]
    fn test_removed_target_is_released_at_next_scan() {
        let mut scene = TestScene::default();
        let enemy = scene.add(1, "Enemy", DVec3::new(3.0, 0.0, 0.0));
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig {
            fire_rate: 0.0,
            ..Default::default()
        });

        for tick in 0..5 {
            turret.tick(&ctx(tick), &scene, &mut spawner);
        }
        assert_eq!(turret.state(), BehaviorState::Attack);
        let fired = spawner.requests.len();
        scene.remove(enemy);

        // Until the next scan the turret still holds the id but does nothing with it.
        for tick in 5..60 {
            let report = turret.tick(&ctx(tick), &scene, &mut spawner);
            assert!(report.shots.is_empty());
            assert_eq!(turret.state(), BehaviorState::Attack);
        }
        assert_eq!(spawner.requests.len(), fired);

        let report = turret.tick(&ctx(60), &scene, &mut spawner);
        assert_eq!(report.events, vec![TurretEvent::TargetLost { target: enemy }]);
        assert_eq!(turret.target(), None);

        let report = turret.tick(&ctx(61), &scene, &mut spawner);
        assert_eq!(report.events, vec![TurretEvent::Disengaged]);
        assert_eq!(turret.state(), BehaviorState::Idle);

        for tick in 62..200 {
            let report = turret.tick(&ctx(tick), &scene, &mut spawner);
            assert!(report.events.is_empty());
        }
    }

    #[test]
    fn test_retagged_target_is_dropped() {
        let mut scene = TestScene::default();
        let enemy = scene.add(1, "Enemy", DVec3::new(3.0, 0.0, 0.0));
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig::default());

        for tick in 0..10 {
            turret.tick(&ctx(tick), &scene, &mut spawner);
        }
        scene.retag(enemy, "Friend");
        for tick in 10..62 {
            turret.tick(&ctx(tick), &scene, &mut spawner);
        }
        assert_eq!(turret.target(), None);
        assert_eq!(turret.state(), BehaviorState::Idle);
    }

    #[test]
    fn test_switches_to_nearer_target() {
        let mut scene = TestScene::default();
        let far = scene.add(1, "Enemy", DVec3::new(8.0, 0.0, 0.0));
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig::default());

        for tick in 0..30 {
            turret.tick(&ctx(tick), &scene, &mut spawner);
        }
        assert_eq!(turret.target(), Some(far));
        let near = scene.add(2, "Enemy", DVec3::new(0.0, 2.0, 0.0));

        let mut switched = None;
        for tick in 30..61 {
            let report = turret.tick(&ctx(tick), &scene, &mut spawner);
            for event in report.events {
                if let TurretEvent::TargetSwitched { from, to } = event {
                    switched = Some((tick, from, to));
                }
            }
        }
        assert_eq!(switched, Some((60, far, near)));
        assert_eq!(turret.state(), BehaviorState::Attack);
    }

    #[test]
    fn test_velocity_estimate_and_lead() {
        let mut scene = TestScene::default();
        let start = DVec3::new(6.0, 0.0, 0.0);
        let velocity = DVec3::new(0.0, 1.5, 0.0);
        let enemy = scene.add(1, "Enemy", start);
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig::default());

        for tick in 0..2 {
            scene.move_to(enemy, start + velocity * (tick as f64 * DT));
            turret.tick(&ctx(tick), &scene, &mut spawner);
        }
        // Tick 1 was the first tracked tick.
        assert_eq!(turret.estimated_target_velocity(), DVec3::ZERO);
        assert_eq!(turret.targeting_position(), Some(start + velocity * DT));

        for tick in 2..10 {
            scene.move_to(enemy, start + velocity * (tick as f64 * DT));
            turret.tick(&ctx(tick), &scene, &mut spawner);
        }
        assert_abs_diff_eq!(turret.estimated_target_velocity(), velocity, epsilon = 1e-9);
        let current = start + velocity * (9.0 * DT);
        assert_eq!(turret.previous_target_position(), Some(current));

        // Aim point leads the target along its velocity.
        let aim = turret.targeting_position().unwrap();
        assert!(aim.y > current.y);
        assert_abs_diff_eq!(aim.x, current.x, epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_estimate_with_varying_tick_length() {
        let mut scene = TestScene::default();
        let velocity = DVec3::new(-2.0, 1.0, 0.0);
        let mut position = DVec3::new(5.0, 3.0, 0.0);
        let enemy = scene.add(1, "Enemy", position);
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig::default());

        let mut now = 0.0;
        let steps = [DT, DT, DT, 2.0 * DT, 0.5 * DT, 3.0 * DT, DT];
        for (tick, dt) in steps.into_iter().enumerate() {
            let ctx = TickContext {
                now,
                dt,
                position: DVec3::ZERO,
            };
            turret.tick(&ctx, &scene, &mut spawner);
            // Tick 1 engages; every later tick differences two tracked samples.
            if tick >= 2 {
                assert_abs_diff_eq!(turret.estimated_target_velocity(), velocity, epsilon = 1e-9);
            }
            now += dt;
            position += velocity * dt;
            scene.move_to(enemy, position);
        }
    }

    #[test]
    fn test_turret_converges_on_stationary_target() {
        let mut scene = TestScene::default();
        let position = DVec3::new(6.0, 6.0, 3.0);
        scene.add(1, "Enemy", position);
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig::default());

        for tick in 0..300 {
            turret.tick(&ctx(tick), &scene, &mut spawner);
        }
        let rig = turret.rig();
        assert_abs_diff_eq!(
            rig.head_forward(),
            DVec3::new(1.0, 1.0, 0.0).normalize(),
            epsilon = 1e-9
        );
        let pivot = rig.gun_pivot(DVec3::ZERO);
        let expected_pitch = (position.z - pivot.z).atan2(pivot.distance(position));
        assert_abs_diff_eq!(rig.gun_pitch(), expected_pitch, epsilon = 1e-9);
    }

    #[test]
    fn test_idle_turret_holds_still_by_default() {
        let scene = TestScene::default();
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig::default());
        for tick in 0..120 {
            let report = turret.tick(&ctx(tick), &scene, &mut spawner);
            assert!(report.events.is_empty());
        }
        assert_eq!(turret.rig().head.orientation, DQuat::IDENTITY);
        assert!(spawner.requests.is_empty());
    }

    #[test]
    fn test_idle_look_around() {
        let scene = TestScene::default();
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig {
            idle_scan_rate: 0.5,
            ..Default::default()
        });
        for tick in 0..60 {
            turret.tick(&ctx(tick), &scene, &mut spawner);
        }
        let swept = angle_between(DQuat::IDENTITY, turret.rig().head.orientation);
        assert_abs_diff_eq!(swept, 0.5, epsilon = 1e-9);
        assert!(spawner.requests.is_empty());
    }

    #[test]
    fn test_diagnostics_overlay() {
        let mut scene = TestScene::default();
        let enemy = scene.add(1, "Enemy", DVec3::new(0.0, 5.0, 1.5));
        let mut spawner = RecordingSpawner::default();
        let mut turret = build(TurretConfig::default());
        for tick in 0..3 {
            turret.tick(&ctx(tick), &scene, &mut spawner);
        }
        let overlay = turret.diagnostics(DVec3::ZERO, 3.0 * DT);
        assert_eq!(overlay.state, BehaviorState::Attack);
        assert_eq!(overlay.target, Some(enemy));
        assert_eq!(overlay.vision_radius, DEFAULT_VISION_RADIUS);
        assert!(overlay.aim_point.is_some());
        assert!(!overlay.allow_fire);
        assert_abs_diff_eq!(overlay.gun_pivot.z, 1.5, epsilon = 1e-12);
    }
}
