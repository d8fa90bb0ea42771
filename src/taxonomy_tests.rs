use super::*;

fn labels(pairs: &[(&str, f64)]) -> Vec<LabelScore> {
    pairs
        .iter()
        .map(|(label, score)| LabelScore::new(*label, *score))
        .collect()
}

#[test]
fn test_spec_scenario_car_engine_and_speech() {
    let result = map_labels(&labels(&[("car engine", 0.6), ("speech", 0.3)]));

    assert_eq!(result.dominant().category, SoundCategory::Traffic);
    assert!((result.confidence_for(SoundCategory::Traffic) - 0.6).abs() < 1e-12);
    assert!((result.confidence_for(SoundCategory::Human) - 0.3).abs() < 1e-12);
    assert_eq!(result.confidence_for(SoundCategory::Construction), 0.0);
    assert_eq!(result.confidence_for(SoundCategory::Nature), 0.0);
    assert_eq!(result.confidence_for(SoundCategory::Industrial), 0.0);
    assert_eq!(result.confidence_for(SoundCategory::Other), 0.0);
    assert_eq!(result.origin, Origin::Model);
}

#[test]
fn test_matching_is_case_insensitive() {
    let result = map_labels(&labels(&[("Vehicle Horn", 0.8)]));
    assert_eq!(result.dominant().category, SoundCategory::Traffic);
}

#[test]
fn test_unmatched_labels_accumulate_into_other() {
    let result = map_labels(&labels(&[("theremin", 0.4), ("white noise", 0.2)]));
    assert!((result.confidence_for(SoundCategory::Other) - 0.6).abs() < 1e-12);
    assert_eq!(result.dominant().category, SoundCategory::Other);
}

#[test]
fn test_label_claimed_by_at_most_one_category() {
    // "machine" (Industrial) and "drill" (Construction) both match, but
    // Construction comes first in declaration order and claims the label once.
    let result = map_labels(&labels(&[("drilling machine", 0.5)]));
    assert!((result.confidence_for(SoundCategory::Construction) - 0.5).abs() < 1e-12);
    assert_eq!(result.confidence_for(SoundCategory::Industrial), 0.0);
}

#[test]
fn test_duplicate_labels_sum_then_clamp() {
    // Two traffic labels sum past 1.0; the clamp applies after accumulation.
    let result = map_labels(&labels(&[("car", 0.7), ("truck horn", 0.6)]));
    assert!((result.confidence_for(SoundCategory::Traffic) - 1.0).abs() < 1e-12);
}

#[test]
fn test_output_sorted_non_increasing() {
    let result = map_labels(&labels(&[
        ("bird song", 0.2),
        ("jackhammer", 0.9),
        ("speech", 0.5),
    ]));
    for pair in result.ranked.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
    assert_eq!(result.dominant().category, SoundCategory::Construction);
}

#[test]
fn test_ties_break_by_declaration_order() {
    let result = map_labels(&labels(&[("speech", 0.4), ("car", 0.4)]));
    // Traffic precedes Human in declaration order, so it ranks first on a tie.
    assert_eq!(result.ranked[0].category, SoundCategory::Traffic);
    assert_eq!(result.ranked[1].category, SoundCategory::Human);
}

#[test]
fn test_all_confidences_within_unit_interval() {
    let result = map_labels(&labels(&[
        ("car", 0.9),
        ("car horn", 0.9),
        ("traffic", 0.9),
        ("rain", 0.3),
    ]));
    for entry in &result.ranked {
        assert!(entry.confidence >= 0.0 && entry.confidence <= 1.0);
    }
}

#[test]
fn test_preclamp_totals_equal_matched_input_sums() {
    // Keep every category under 1.0 so the clamp is a no-op and the output
    // totals are directly comparable to the input sums.
    let input = labels(&[
        ("car", 0.3),
        ("engine idling", 0.25),
        ("speech", 0.2),
        ("theremin", 0.15),
    ]);
    let result = map_labels(&input);

    let input_sum: f64 = input.iter().map(|entry| entry.score).sum();
    let output_sum: f64 = result.ranked.iter().map(|entry| entry.confidence).sum();
    assert!((input_sum - output_sum).abs() < 1e-12);
}

#[test]
fn test_empty_input_yields_all_zero_model_result() {
    let result = map_labels(&[]);
    assert_eq!(result.ranked.len(), 6);
    assert!(result.ranked.iter().all(|entry| entry.confidence == 0.0));
    assert_eq!(result.origin, Origin::Model);
}

#[test]
fn test_every_category_present_exactly_once() {
    let result = map_labels(&labels(&[("car", 0.5)]));
    assert_eq!(result.ranked.len(), 6);
    for category in SoundCategory::ALL {
        assert_eq!(
            result
                .ranked
                .iter()
                .filter(|entry| entry.category == category)
                .count(),
            1
        );
    }
}

#[test]
fn test_categorize_samples() {
    assert_eq!(categorize("car engine"), SoundCategory::Traffic);
    assert_eq!(categorize("jackhammer"), SoundCategory::Construction);
    assert_eq!(categorize("bird chirping"), SoundCategory::Nature);
    assert_eq!(categorize("crowd chatter"), SoundCategory::Human);
    assert_eq!(categorize("factory floor"), SoundCategory::Industrial);
    assert_eq!(categorize("zzzz"), SoundCategory::Other);
}
