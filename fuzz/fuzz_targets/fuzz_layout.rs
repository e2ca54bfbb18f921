#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use territory_layout::{
    ExhaustionPolicy, LayoutConfig, LayoutEngine, LayoutError, Participant, SpiralConfig, Strategy,
};

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u16,
    min_tile_size: u8,
    strategy: u8,
    drop_on_exhaustion: bool,
    angle_step: u8,
    radius_step: u8,
    weights: Vec<u16>,
}

fuzz_target!(|input: Input| {
    // Keep spiral runs bounded: at most 64 participants in a 65535-cell grid.
    let participants: Vec<Participant> = input
        .weights
        .iter()
        .take(64)
        .enumerate()
        .map(|(i, w)| Participant::new(format!("p{i}"), f64::from(*w) / 16.0))
        .collect();

    let strategy = Strategy::ALL[usize::from(input.strategy) % Strategy::ALL.len()];
    let exhaustion = if input.drop_on_exhaustion {
        ExhaustionPolicy::DropParticipant
    } else {
        ExhaustionPolicy::FailFast
    };
    let config = LayoutConfig::default()
        .with_strategy(strategy)
        .with_min_tile_size(u32::from(input.min_tile_size % 8))
        .with_exhaustion(exhaustion)
        .with_spiral(SpiralConfig {
            angle_step_degrees: f64::from(input.angle_step.max(5)),
            radius_step: u32::from(input.radius_step % 6),
            max_radius: None,
        });
    let engine = LayoutEngine::new(config.clone());

    match engine.layout(&participants, u32::from(input.capacity)) {
        Ok(result) => {
            // Post-conditions that must always hold:
            assert_eq!(result.verify(config.min_tile_size), Ok(()));
            let active = participants.iter().filter(|p| p.is_active()).count();
            assert_eq!(result.len() + result.dropped.len(), active);
            assert_eq!(engine.layout(&participants, u32::from(input.capacity)), Ok(result));
        }
        Err(LayoutError::InvalidInput(_) | LayoutError::CapacityExceeded { .. }) => {}
        Err(err @ LayoutError::PlacementExhausted { .. }) => {
            // Column-pack fallback is on by default.
            panic!("exhaustion escaped the fallback: {err}");
        }
    }
});
