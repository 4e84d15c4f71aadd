//! Ride settings and ratings copied into a new design.

use track_design_core::{DesignFlags, DesignStatistics, Ride, RideMeasurements, TrackDesign};

/// Largest air time, in design units, that still fits the record.
const MAX_AIR_TIME: i32 = 255;

/// Starts a design for `ride` with its settings, colours and ratings.
pub(crate) fn design_for(ride: &Ride) -> TrackDesign {
    let mut design = TrackDesign::new(ride.ride_type);
    design.vehicle_object = ride.vehicle.clone();
    design.ride_mode = ride.mode;
    design.colour_scheme = ride.colour_scheme_type & 3;
    design.vehicle_colours = ride.vehicle_colours.clone();
    design.track_colours = ride.track_colours;
    design.entrance_style = ride.entrance_style;
    design.operating = ride.operating;
    design.statistics = statistics(&ride.measurements);
    design.track_flags = DesignFlags::empty();
    design
}

fn statistics(measured: &RideMeasurements) -> DesignStatistics {
    let air_time = i32::from(measured.total_air_time) * 123 / 1024;
    DesignStatistics {
        max_speed: saturate_i8(measured.max_speed / 65536),
        average_speed: saturate_i8(measured.average_speed / 65536),
        ride_length: saturate_u16(measured.total_length / 65536),
        max_positive_vertical_g: saturate_u8(i32::from(measured.max_positive_vertical_g) / 32),
        max_negative_vertical_g: saturate_i8(i32::from(measured.max_negative_vertical_g) / 32),
        max_lateral_g: saturate_u8(i32::from(measured.max_lateral_g) / 32),
        inversions: (measured.inversions & 0x1F) | (measured.sheltered_eighths << 5),
        holes: measured.holes,
        drops: measured.drops,
        highest_drop: measured.highest_drop,
        excitement: saturate_u8(i32::from(measured.excitement) / 10),
        intensity: saturate_u8(i32::from(measured.intensity) / 10),
        nausea: saturate_u8(i32::from(measured.nausea) / 10),
        total_air_time: if air_time > MAX_AIR_TIME {
            0
        } else {
            saturate_u8(air_time)
        },
        upkeep_cost: measured.upkeep_cost,
    }
}

fn saturate_i8(value: i32) -> i8 {
    i8::try_from(value).unwrap_or(if value < 0 { i8::MIN } else { i8::MAX })
}

fn saturate_u8(value: i32) -> u8 {
    u8::try_from(value).unwrap_or(if value < 0 { 0 } else { u8::MAX })
}

fn saturate_u16(value: i32) -> u16 {
    u16::try_from(value).unwrap_or(if value < 0 { 0 } else { u16::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_design_core::{ObjectReference, RideId, RideType};

    fn measured_ride() -> Ride {
        let mut ride = Ride::new(
            RideId::new(1),
            RideType::SteelCoaster,
            Some(ObjectReference::new("rct2.ride.steel_train")),
        );
        ride.colour_scheme_type = 0b110;
        ride.measurements = RideMeasurements {
            max_speed: 40 * 65536 + 1200,
            average_speed: 18 * 65536,
            total_length: 700 * 65536,
            max_positive_vertical_g: 320,
            max_negative_vertical_g: -96,
            max_lateral_g: 250,
            inversions: 3,
            sheltered_eighths: 2,
            total_air_time: 100,
            excitement: 655,
            intensity: 720,
            nausea: 410,
            upkeep_cost: 90,
            ..RideMeasurements::default()
        };
        ride
    }

    #[test]
    fn ratings_are_scaled_into_the_record() {
        let design = design_for(&measured_ride());
        let stats = design.statistics;
        assert_eq!(stats.max_speed, 40, "integer part of the speed");
        assert_eq!(stats.average_speed, 18);
        assert_eq!(stats.ride_length, 700);
        assert_eq!(stats.max_positive_vertical_g, 10);
        assert_eq!(stats.max_negative_vertical_g, -3);
        assert_eq!(stats.max_lateral_g, 7);
        assert_eq!(stats.inversions, 3 | (2 << 5), "sheltered eighths share the byte");
        assert_eq!(stats.total_air_time, 12);
        assert_eq!((stats.excitement, stats.intensity, stats.nausea), (65, 72, 41));
        assert_eq!(stats.upkeep_cost, 90);
    }

    #[test]
    fn settings_are_copied_and_flags_cleared() {
        let design = design_for(&measured_ride());
        assert_eq!(design.colour_scheme, 2, "only the low two bits are kept");
        assert_eq!(
            design.vehicle_object.as_ref().map(ObjectReference::as_str),
            Some("rct2.ride.steel_train")
        );
        assert_eq!(design.track_flags, DesignFlags::empty());
    }

    #[test]
    fn overlong_air_time_is_dropped() {
        let mut ride = measured_ride();
        ride.measurements.total_air_time = 3000;
        assert_eq!(design_for(&ride).statistics.total_air_time, 0);
    }
}
