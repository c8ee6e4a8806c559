//! Cloud copy and average parcel mass behaviour of a spray cloud
//!
//! Run tests with: cargo test --test `cloud_lifecycle`

use approx::assert_relative_eq;
use spray_core::{
    physics::atomization::UniformCoeffs, AtomizationConfig, BreakupConfig, DragIntegrator,
    FlowState, InjectionEvent, SprayCloud, SprayCloudConfig, SprayError, UniformFlow, Vec3,
};

#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const INJECTION_SPEED: f32 = 10.0;

fn cloud(breakup: BreakupConfig) -> SprayCloud {
    let config = SprayCloudConfig {
        name: "lifecycle".to_string(),
        atomization: AtomizationConfig::Uniform(UniformCoeffs {
            diameter: Some(100.0e-6),
        }),
        breakup,
        ..SprayCloudConfig::default()
    };
    SprayCloud::new(&config).expect("valid configuration")
}

/// 100 parcels of 1 kg each, moving along +x
fn hundred_unit_parcels() -> InjectionEvent {
    InjectionEvent {
        id: 1,
        position: Vec3::zeros(),
        direction: Vec3::x(),
        mass_flow_rate: 100.0,
        duration: 1.0,
        injection_speed: INJECTION_SPEED,
        nozzle_diameter: 200.0e-6,
        parcels: 100,
    }
}

/// Gas moving with the injected liquid: no relative velocity, no breakup
fn co_moving_gas() -> UniformFlow {
    UniformFlow::new(
        FlowState::quiescent_air().with_velocity(Vec3::new(INJECTION_SPEED, 0.0, 0.0)),
    )
}

#[test]
fn test_end_to_end_snapshot_scenario() {
    let mut cloud = cloud(BreakupConfig::default());
    let gas = co_moving_gas();

    assert_eq!(cloud.inject(&hundred_unit_parcels(), &gas).unwrap(), 100);
    assert_eq!(cloud.average_parcel_mass(), 1.0);

    let before = cloud.parcels().to_vec();
    let report = cloud.apply_breakup(&gas, 1.0e-4).unwrap();
    assert!(report.children.is_empty());
    assert_eq!(report.broken, 0);
    assert_eq!(cloud.insert_children(report), 0);
    assert_eq!(cloud.parcels(), before.as_slice());

    cloud.take_snapshot();
    let copy = cloud.cloud_copy().unwrap();
    assert_eq!(copy.len(), 100);
    assert_eq!(copy.average_parcel_mass(), 1.0);

    let doomed: Vec<u64> = cloud.parcels().iter().take(10).map(|p| p.id()).collect();
    for id in doomed {
        assert!(cloud.remove_parcel(id).is_some());
    }

    assert_eq!(cloud.len(), 90);
    assert_eq!(cloud.average_parcel_mass(), 1.0);
    assert_relative_eq!(cloud.total_mass(), 90.0);

    let copy = cloud.cloud_copy().unwrap();
    assert_eq!(copy.len(), 100);
    assert_eq!(copy.average_parcel_mass(), 1.0);
    assert_relative_eq!(copy.total_mass(), 100.0);
    assert_relative_eq!(cloud.mass_change_since_snapshot().unwrap(), -10.0);
}

#[test]
fn test_no_snapshot_is_an_error() {
    let mut cloud = cloud(BreakupConfig::None);
    assert!(matches!(cloud.cloud_copy(), Err(SprayError::NoSnapshot)));
    assert!(matches!(cloud.restore_state(), Err(SprayError::NoSnapshot)));
    assert!(matches!(
        cloud.mass_change_since_snapshot(),
        Err(SprayError::NoSnapshot)
    ));
    assert!(!cloud.has_cloud_copy());
}

#[test]
fn test_snapshot_is_independent_of_live_cloud() {
    let mut cloud = cloud(BreakupConfig::None);
    let still_air = UniformFlow::new(FlowState::quiescent_air());
    cloud.inject(&hundred_unit_parcels(), &still_air).unwrap();
    cloud.take_snapshot();
    let frozen = cloud.cloud_copy().unwrap().clone();

    cloud
        .evolve(&DragIntegrator::default(), &still_air, 1.0e-3)
        .unwrap();
    cloud.retain_parcels(|p| p.id() < 50);
    cloud.inject(&hundred_unit_parcels(), &still_air).unwrap();

    let copy = cloud.cloud_copy().unwrap();
    assert_eq!(copy, &frozen);
    assert_eq!(copy.len(), 100);
    assert_eq!(copy.step(), 0);
    assert!(copy.parcels().iter().all(|p| p.position == Vec3::zeros()));
    assert!(cloud.parcels().iter().any(|p| p.position != Vec3::zeros()));
}

#[test]
fn test_new_snapshot_replaces_old() {
    let mut cloud = cloud(BreakupConfig::None);
    let gas = co_moving_gas();
    cloud.inject(&hundred_unit_parcels(), &gas).unwrap();
    cloud.take_snapshot();

    cloud.retain_parcels(|p| p.id() % 4 == 0);
    cloud.take_snapshot();

    let copy = cloud.cloud_copy().unwrap();
    assert_eq!(copy.len(), 25);
    assert_relative_eq!(copy.total_mass(), 25.0);
    assert_eq!(copy.atomization_model(), "uniform");
    assert_eq!(copy.breakup_model(), "none");
}

#[test]
fn test_average_mass_tracks_every_mutation() {
    let mut cloud = cloud(BreakupConfig::None);
    let gas = co_moving_gas();
    assert_eq!(cloud.average_parcel_mass(), 0.0);

    cloud.inject(&hundred_unit_parcels(), &gas).unwrap();
    let mut heavy = hundred_unit_parcels();
    heavy.mass_flow_rate = 300.0;
    cloud.inject(&heavy, &gas).unwrap();
    // 100 parcels of 1 kg and 100 of 3 kg
    assert_relative_eq!(cloud.average_parcel_mass(), 2.0);

    cloud.retain_parcels(|p| p.mass > 2.0);
    assert_relative_eq!(cloud.average_parcel_mass(), 3.0);

    cloud.retain_parcels(|_| false);
    assert!(cloud.is_empty());
    assert_eq!(cloud.average_parcel_mass(), 0.0);
}

#[test]
fn test_restore_rolls_back_a_rejected_update() {
    let mut cloud = cloud(BreakupConfig::None);
    let still_air = UniformFlow::new(FlowState::quiescent_air());
    cloud.inject(&hundred_unit_parcels(), &still_air).unwrap();
    cloud.take_snapshot();

    cloud
        .evolve(&DragIntegrator::default(), &still_air, 1.0e-2)
        .unwrap();
    assert_eq!(cloud.step(), 1);

    cloud.restore_state().unwrap();
    assert_eq!(cloud.step(), 0);
    assert_eq!(cloud.time(), 0.0);
    assert_eq!(cloud.parcels(), cloud.cloud_copy().unwrap().parcels());
    assert_eq!(cloud.average_parcel_mass(), 1.0);
}
