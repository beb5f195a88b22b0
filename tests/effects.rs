#![cfg(not(target_arch = "wasm32"))]

use std::time::Duration;

use elemental_wasm::crossfade::{offset, zoom, CrossfadeRig, Layer, DEFAULT_ZOOM};
use elemental_wasm::motion::{AmbientMotion, PointerWriter};
use elemental_wasm::particles::{self, Particles};
use elemental_wasm::pulse::{base, base_named, FilterPulse};
use elemental_wasm::{SceneConfig, ThemeId};
use pretty_assertions::assert_eq;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn idle_rig_shows_one_opaque_layer() {
    let rig = CrossfadeRig::new(ThemeId::Electricity, ms(600));
    let layers = rig.layers(ms(0));
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].theme, ThemeId::Electricity);
    assert_eq!(layers[0].opacity, 1.0);
    assert!(!layers[0].incoming);
}

#[test]
fn crossfade_runs_to_completion() {
    let mut rig = CrossfadeRig::new(ThemeId::Electricity, ms(600));
    assert!(!rig.observe(ThemeId::Electricity, ms(0)));
    assert!(rig.observe(ThemeId::Fire, ms(0)));
    assert_eq!(rig.incoming(), Some(ThemeId::Fire));

    assert_eq!(rig.opacities(ms(0)), (1.0, 0.0));
    let (out, inc) = rig.opacities(ms(300));
    assert!(close(out, 0.5) && close(inc, 0.5));
    assert_eq!(rig.opacities(ms(600)), (0.0, 1.0));

    assert!(!rig.advance(ms(599)));
    assert!(rig.advance(ms(600)));
    assert!(rig.is_idle());
    assert_eq!(rig.active(), ThemeId::Fire);
    let layers = rig.layers(ms(600));
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].opacity, 1.0);
}

#[test]
fn change_during_fade_is_picked_up_when_idle() {
    let mut rig = CrossfadeRig::new(ThemeId::Electricity, ms(600));
    rig.observe(ThemeId::Fire, ms(0));
    // Ignored while the first session is running.
    assert!(!rig.observe(ThemeId::Water, ms(100)));
    assert_eq!(rig.incoming(), Some(ThemeId::Fire));

    rig.advance(ms(600));
    assert!(rig.observe(ThemeId::Water, ms(600)));
    rig.advance(ms(1200));
    assert_eq!(rig.active(), ThemeId::Water);
}

#[test]
fn zoom_and_offset_tables() {
    assert_eq!(zoom(ThemeId::Electricity), 1.2);
    assert_eq!(zoom(ThemeId::Wind), 1.2);
    assert_eq!(zoom(ThemeId::Shadow), 1.2);
    assert_eq!(zoom(ThemeId::Ice), 1.05);
    assert_eq!(zoom(ThemeId::Fire), DEFAULT_ZOOM);
    assert_eq!(offset(ThemeId::Electricity), [-0.24, 0.0]);
    assert_eq!(offset(ThemeId::Water), [0.0, 0.0]);
}

#[test]
fn pointer_is_normalized_with_y_up() {
    let writer = PointerWriter::new();
    let reader = writer.reader();
    writer.move_to(0.0, 0.0, 800.0, 600.0);
    assert_eq!(reader.get(), [-1.0, 1.0]);
    writer.move_to(800.0, 600.0, 800.0, 600.0);
    assert_eq!(reader.get(), [1.0, -1.0]);
    writer.move_to(400.0, 300.0, 800.0, 600.0);
    assert_eq!(reader.get(), [0.0, 0.0]);
    writer.move_to(10.0, 10.0, 0.0, 0.0);
    assert_eq!(reader.get(), [0.0, 0.0]);
    writer.set(5.0, -5.0);
    assert_eq!(reader.get(), [1.0, -1.0]);
}

#[test]
fn parallax_stays_put_without_input() {
    let config = SceneConfig::default();
    let mut motion = AmbientMotion::new(&config, PointerWriter::new().reader(), ms(0));
    for _ in 0..100 {
        motion.step();
    }
    assert_eq!(motion.parallax(), [0.0, 0.0]);
}

#[test]
fn parallax_converges_to_inverted_pointer() {
    let config = SceneConfig::default();
    let writer = PointerWriter::new();
    let mut motion = AmbientMotion::new(&config, writer.reader(), ms(0));
    writer.set(1.0, -1.0);

    let mut last = 0.0f32;
    for _ in 0..500 {
        motion.step();
        let [x, _] = motion.parallax();
        assert!(x <= last);
        last = x;
    }
    let [x, y] = motion.parallax();
    assert!(close(x, -config.parallax_strength));
    assert!(close(y, config.parallax_strength));
}

#[test]
fn breathing_and_entrance() {
    let config = SceneConfig::default();
    let motion = AmbientMotion::new(&config, PointerWriter::new().reader(), ms(0));
    for i in 0..1000 {
        let b = motion.breathing(i as f32 * 0.1);
        assert!((1.0..=1.0 + config.breathing_amplitude + 1e-6).contains(&b));
    }
    assert_eq!(motion.entrance_z(ms(0)), config.entrance_start_z);
    assert_eq!(motion.entrance_z(ms(3000)), config.entrance_start_z);
    assert!(motion.entrance_z(ms(4000)) < config.entrance_start_z);
    assert_eq!(motion.entrance_z(ms(5000)), 0.0);
}

#[test]
fn layer_transform_combines_motion() {
    let config = SceneConfig::default();
    let motion = AmbientMotion::new(&config, PointerWriter::new().reader(), ms(0));
    let layer = Layer {
        theme: ThemeId::Electricity,
        opacity: 0.25,
        zoom: 1.2,
        offset: [-0.24, 0.0],
        incoming: true,
    };
    let t = motion.transform(&layer, [10.0, 5.0], ms(0));
    // At t = 0 the breathing sits halfway and the y drift at its peak.
    assert!(close(t.scale[0], 10.2) && close(t.scale[1], 5.1));
    assert!(close(t.position[0], -0.24));
    assert!(close(t.position[1], config.drift_amplitude[1]));
    assert_eq!(t.position[2], config.entrance_start_z);
    assert_eq!(t.opacity, 0.25);
}

#[test]
fn unknown_theme_uses_fallback_base() {
    assert_eq!(base_named("bogus"), base(ThemeId::Electricity));
    assert_eq!(base_named("fire"), base(ThemeId::Fire));
    let b = base(ThemeId::Shadow);
    assert_eq!(b.bloom_intensity, 0.2);
    assert_eq!(b.vignette_darkness, 0.8);
    assert_eq!(b.chromatic_offset, 0.0);
}

#[test]
fn spike_decays_to_zero_and_restarts() {
    let config = SceneConfig::default();
    let mut pulse = FilterPulse::new(&config);
    assert_eq!(pulse.spike(ms(0)), 0.0);

    pulse.on_theme_change(ms(1000));
    assert_eq!(pulse.spike(ms(1000)), config.spike_peak);
    assert!(close(pulse.spike(ms(1300)), config.spike_peak / 2.0));
    assert_eq!(pulse.spike(ms(1600)), 0.0);

    pulse.on_theme_change(ms(2000));
    pulse.on_theme_change(ms(2400));
    assert_eq!(pulse.spike(ms(2400)), config.spike_peak);
    assert!(pulse.spike(ms(2900)) > 0.0);
    assert_eq!(pulse.spike(ms(3000)), 0.0);
}

#[test]
fn spike_shows_up_in_chromatic_offset() {
    let config = SceneConfig::default();
    let mut pulse = FilterPulse::new(&config);
    pulse.on_theme_change(ms(0));
    let params = pulse.params(ThemeId::Fire, ms(0));
    assert_eq!(params.chromatic_offset, [config.spike_peak; 2]);
    assert_eq!(params.bloom_threshold, 0.8);
}

#[test]
fn pulse_sampling_is_throttled() {
    let mut pulse = FilterPulse::new(&SceneConfig::default());
    assert!(pulse.tick(ms(0)));
    assert!(!pulse.tick(ms(16)));
    assert!(!pulse.tick(ms(99)));
    assert!(pulse.tick(ms(100)));
}

#[test]
fn pulses_stay_within_amplitude() {
    let config = SceneConfig::default();
    let mut pulse = FilterPulse::new(&config);
    for i in 0..500 {
        let now = ms(i * 100);
        pulse.tick(now);
        let p = pulse.params(ThemeId::Water, now);
        assert!((0.2..=0.2 + config.bloom_pulse_amplitude + 1e-6).contains(&p.bloom_intensity));
        assert!((0.8..=0.8 + config.vignette_pulse_amplitude + 1e-6).contains(&p.vignette_darkness));
    }
}

#[test]
fn particles_wrap_to_the_bottom() {
    let config = SceneConfig::default();
    let mut rng = SmallRng::seed_from_u64(3);
    let mut parts = Particles::new(&config, ms(0), &mut rng);
    assert_eq!(parts.positions().len(), config.particle_count);

    parts.step(Duration::from_secs(30), &mut rng);
    for p in parts.positions() {
        assert_eq!(p[1], -particles::SPREAD[1]);
        assert!(p[0].abs() <= particles::SPREAD[0]);
    }
}

#[test]
fn particles_stay_in_bounds() {
    let config = SceneConfig::default();
    let mut rng = SmallRng::seed_from_u64(11);
    let mut parts = Particles::new(&config, ms(0), &mut rng);
    let dt = ms(16);
    let max_rise = particles::SPEED * dt.as_secs_f32();
    for _ in 0..2000 {
        parts.step(dt, &mut rng);
        for p in parts.positions() {
            assert!(p[1] >= -particles::SPREAD[1]);
            assert!(p[1] <= particles::SPREAD[1] + max_rise);
            assert!(p[2] >= particles::Z_OFFSET);
            assert!(p[2] <= particles::Z_OFFSET + particles::SPREAD[2]);
        }
    }
}

#[test]
fn particles_fade_in_after_delay() {
    let mut rng = SmallRng::seed_from_u64(0);
    let parts = Particles::new(&SceneConfig::default(), ms(0), &mut rng);
    assert_eq!(parts.opacity(ms(0)), 0.0);
    assert_eq!(parts.opacity(ms(4000)), 0.0);
    assert_eq!(parts.opacity(ms(6000)), particles::OPACITY);
}
