//! End-to-end sweeps of the reference inverter: Vdd = 1.8 V, NMOS 1/0.18, PMOS 2/0.18.

use approx::assert_abs_diff_eq;
use cmos_vtc::device::DeviceConstants;
use cmos_vtc::solver::Residual;
use cmos_vtc::technology::PhysicalConstants;
use cmos_vtc::{
    Geometry, InverterConfig, MosKind, SolverConfig, SweepDriver, SweepRange, Technology,
    TransferCurve, VtcError,
};

const VDD: f64 = 1.8;

fn config(technology: Technology) -> InverterConfig {
    InverterConfig::new(VDD, Geometry::new(1.0, 0.18), Geometry::new(2.0, 0.18))
        .with_technology(technology)
}

fn sweep(technology: Technology) -> (SweepDriver, TransferCurve) {
    let driver = SweepDriver::new(config(technology), SolverConfig::default()).unwrap();
    let curve = driver.run(&SweepRange::up_to(VDD)).unwrap();
    (driver, curve)
}

fn assert_reference_shape(driver: &SweepDriver, curve: &TransferCurve) {
    assert_eq!(curve.len(), 181);
    assert_eq!(curve.unresolved_count(), 0);

    let first = curve.points()[0];
    let last = curve.points()[180];
    assert_eq!(first.vin, 0.0);
    assert_eq!(last.vin, VDD);
    assert_abs_diff_eq!(first.vout, VDD, epsilon = 1e-9);
    assert_abs_diff_eq!(first.id, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(last.vout, 0.0, epsilon = 1e-9);

    let mid = curve.nearest(0.5 * VDD).unwrap();
    assert!(mid.vout > 0.0 && mid.vout < VDD);

    // Falling curve
    for pair in curve.points().windows(2) {
        assert!(
            pair[1].vout <= pair[0].vout + 1e-9,
            "Vout rises between Vin = {} and {}",
            pair[0].vin,
            pair[1].vin
        );
    }

    // Every point balances the two branch currents
    let tol = driver.solver_config();
    for p in curve {
        let balance = driver.residual(p.vin);
        let r = balance.residual(p.vout);
        assert!(
            tol.accepts(r, balance.scale(p.vout)),
            "residual {r:e} out of tolerance at Vin = {}",
            p.vin
        );
    }

    // Transition sits between the two thresholds, near mid-rail
    let vth_n = driver.device(MosKind::Nmos).vth;
    let vth_p = driver.device(MosKind::Pmos).vth.abs();
    let steepest = curve.steepest_point().unwrap();
    assert!(steepest.vin > vth_n && steepest.vin < VDD - vth_p);
    assert!((steepest.vin - 0.5 * VDD).abs() < 0.2);
    assert!(steepest.gain < 0.0);

    let vm = curve.switching_threshold().unwrap();
    assert!(vm > vth_n && vm < VDD - vth_p);
}

#[test]
fn test_reference_inverter() {
    let (driver, curve) = sweep(Technology::base());
    assert_reference_shape(&driver, &curve);
}

#[test]
fn test_reference_inverter_with_channel_length_modulation() {
    let (driver, curve) = sweep(Technology::with_channel_length_modulation());
    assert_reference_shape(&driver, &curve);
}

#[test]
fn test_nmos_cutoff_below_threshold() {
    let (driver, curve) = sweep(Technology::base());
    let vth_n = driver.device(MosKind::Nmos).vth;
    for p in curve.iter().filter(|p| p.vin <= vth_n) {
        assert_eq!(p.id, 0.0);
        assert_eq!(driver.residual(p.vin).nmos_current(p.vout), 0.0);
    }
}

#[test]
fn test_device_constants_are_sweep_invariant() {
    let cfg = config(Technology::base());
    let (driver, _) = sweep(Technology::base());

    for kind in [MosKind::Nmos, MosKind::Pmos] {
        let fresh = DeviceConstants::derive(
            kind,
            &cfg.constants,
            cfg.technology.params(kind),
            cfg.geometry(kind),
        )
        .unwrap();
        assert_eq!(*driver.device_constants(kind), fresh);

        // Hoisted threshold equals a per-point recomputation
        let device = driver.device(kind);
        for _vin in SweepRange::up_to(VDD).values() {
            assert_eq!(device.threshold_at(cfg.vsb(kind)).unwrap(), device.vth);
        }
    }
}

#[test]
fn test_reverse_order_matches_ascending() {
    let (driver, curve) = sweep(Technology::base());
    let mut reversed: Vec<f64> = curve.vin();
    reversed.reverse();

    let points = driver.solve_points(&reversed).unwrap();
    for (p, q) in points.iter().rev().zip(curve.iter()) {
        assert_eq!(p.vin, q.vin);
        assert_eq!(p.vout, q.vout);
        assert_eq!(p.id, q.id);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let (driver, curve) = sweep(Technology::with_channel_length_modulation());
    let parallel = driver.run_parallel(&SweepRange::up_to(VDD)).unwrap();
    assert_eq!(parallel, curve);
}

#[test]
fn test_partial_sweep_range() {
    let driver = SweepDriver::new(config(Technology::base()), SolverConfig::default()).unwrap();
    let curve = driver.run(&SweepRange::up_to(1.0)).unwrap();
    assert_eq!(curve.len(), 101);
    assert_eq!(curve.points()[100].vin, 1.0);
}

#[test]
fn test_body_bias_out_of_domain() {
    // 2·φf + VSB < 0 for the PMOS (VSB = Vdd − Vbulk)
    let cfg = config(Technology::base()).with_vbulk(8.0);
    let err = SweepDriver::new(cfg, SolverConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        VtcError::NumericDomain {
            device: MosKind::Pmos,
            ..
        }
    ));
}

#[test]
fn test_body_bias_raises_nmos_threshold() {
    let biased = SweepDriver::new(
        config(Technology::base()).with_vbulk(0.5),
        SolverConfig::default(),
    )
    .unwrap();
    let (unbiased, _) = sweep(Technology::base());
    assert!(biased.device(MosKind::Nmos).vth > unbiased.device(MosKind::Nmos).vth);
}

#[test]
fn test_substitute_physical_constants() {
    let hot = PhysicalConstants {
        thermal_voltage: 0.0300,
        ..PhysicalConstants::default()
    };
    let default = SweepDriver::new(config(Technology::base()), SolverConfig::default()).unwrap();
    let substituted = SweepDriver::new(
        config(Technology::base()).with_constants(hot),
        SolverConfig::default(),
    )
    .unwrap();

    let phi_default = default.device_constants(MosKind::Pmos).phi_f;
    let phi_hot = substituted.device_constants(MosKind::Pmos).phi_f;
    assert_abs_diff_eq!(phi_hot / phi_default, 0.0300 / 0.025875, epsilon = 1e-12);

    // K does not depend on the thermal voltage
    assert_eq!(
        default.device_constants(MosKind::Pmos).k,
        substituted.device_constants(MosKind::Pmos).k
    );
}
