/// Placeholder readings for sensor dropout.
///
/// The InSight lander regularly reported sols with no temperature or wind
/// data. To keep displays populated, ingestion can substitute a synthetic
/// reading drawn from a plausible range for each quantity. Every generated
/// reading is tagged `Provenance::Placeholder`.
///
/// # Randomness injection
/// All generators take `rng: &mut R` rather than reaching for a global
/// source, so seeded RNGs make placeholders deterministic in tests.
/// Pressure has no generator: a missing `PRE` stays absent.

use rand::Rng;

use crate::model::{CompassPoint, Provenance, SensorReading, WindDirectionReading};

// ---------------------------------------------------------------------------
// Ranges (half-open, [low, high))
// ---------------------------------------------------------------------------

/// Temperature placeholder ranges, °F.
pub const TEMPERATURE_AVERAGE: (f64, f64) = (-66.7, -58.3);
pub const TEMPERATURE_MINIMUM: (f64, f64) = (-100.0, -75.0);
pub const TEMPERATURE_MAXIMUM: (f64, f64) = (-16.7, 20.0);
pub const TEMPERATURE_SAMPLES: (u32, u32) = (300_784, 326_642);

/// Horizontal wind speed placeholder ranges, m/s.
pub const WIND_SPEED_AVERAGE: (f64, f64) = (4.0, 7.0);
pub const WIND_SPEED_MINIMUM: (f64, f64) = (2.0, 3.0);
pub const WIND_SPEED_MAXIMUM: (f64, f64) = (15.0, 30.0);
pub const WIND_SPEED_SAMPLES: (u32, u32) = (120_000, 154_146);

/// Wind direction is drawn from 32 positions, 11.25° apart.
pub const WIND_DIRECTION_POSITIONS: usize = 32;
pub const WIND_DIRECTION_STEP_DEG: f64 = 11.25;
pub const WIND_DIRECTION_SAMPLES: (u32, u32) = (20_000, 28_551);

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn sensor_placeholder<R: Rng + ?Sized>(
    rng: &mut R,
    average: (f64, f64),
    minimum: (f64, f64),
    maximum: (f64, f64),
    samples: (u32, u32),
) -> SensorReading {
    SensorReading {
        average: rng.gen_range(average.0..average.1),
        minimum: rng.gen_range(minimum.0..minimum.1),
        maximum: rng.gen_range(maximum.0..maximum.1),
        sample_count: rng.gen_range(samples.0..samples.1),
        provenance: Provenance::Placeholder,
    }
}

pub fn temperature<R: Rng + ?Sized>(rng: &mut R) -> SensorReading {
    sensor_placeholder(
        rng,
        TEMPERATURE_AVERAGE,
        TEMPERATURE_MINIMUM,
        TEMPERATURE_MAXIMUM,
        TEMPERATURE_SAMPLES,
    )
}

pub fn wind_speed<R: Rng + ?Sized>(rng: &mut R) -> SensorReading {
    sensor_placeholder(
        rng,
        WIND_SPEED_AVERAGE,
        WIND_SPEED_MINIMUM,
        WIND_SPEED_MAXIMUM,
        WIND_SPEED_SAMPLES,
    )
}

/// Picks one of the 32 compass positions at random.
///
/// The 16-point label is `CompassPoint::ALL[index / 2]`, so odd positions
/// share the label of the position before them.
pub fn wind_direction<R: Rng + ?Sized>(rng: &mut R) -> WindDirectionReading {
    let index = rng.gen_range(0..WIND_DIRECTION_POSITIONS);
    wind_direction_at(index, rng.gen_range(WIND_DIRECTION_SAMPLES.0..WIND_DIRECTION_SAMPLES.1))
}

fn wind_direction_at(index: usize, sample_count: u32) -> WindDirectionReading {
    let degrees = index as f64 * WIND_DIRECTION_STEP_DEG;
    let radians = degrees.to_radians();

    WindDirectionReading {
        compass_point: CompassPoint::ALL[index / 2],
        compass_degrees: degrees,
        compass_right: radians.sin(),
        compass_up: radians.cos(),
        sample_count,
        provenance: Provenance::Placeholder,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
