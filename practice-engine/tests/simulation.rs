use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::executor::block_on;
use language_utils::LanguageDescriptor;
use practice_engine::{
    ConstantLearner, DailySimulation, ItemId, ItemRecord, MemoryStore, PracticeFilters,
    ScoringRules, SeededLearner, WordRecord,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap()
}

fn vocabulary(size: usize) -> Vec<ItemRecord> {
    (0..size)
        .map(|i| {
            ItemRecord::Word(WordRecord {
                id: ItemId(format!("w{i}")),
                word: format!("mot{i}"),
                translation: format!("word{i}"),
                plural_form: None,
                example_sentence: None,
                notes: None,
                image_url: None,
                audio_url: None,
                learning_score: 0,
                last_practiced: None,
                practice_count: 0,
                source_language: LanguageDescriptor::new("en", "English"),
                target_language: LanguageDescriptor::new("es", "Spanish"),
                categories: vec![],
            })
        })
        .collect()
}

#[test]
fn new_items_are_introduced_before_repeats() {
    let mut sim = DailySimulation::new(
        MemoryStore::new(vocabulary(10)),
        ScoringRules::default(),
        ConstantLearner(true),
        start(),
        7,
        5,
    );
    let filters = PracticeFilters::default();

    // Ten new items fill the whole selection window all day.
    let day0 = block_on(sim.next_day(&filters));
    assert_eq!(day0.day, 0);
    assert_eq!(day0.answered, 5);
    assert_eq!(day0.accuracy_percent(), 100);
    assert_eq!(day0.level_counts, [5, 5, 0, 0, 0]);

    // Once new items run short, practiced ones share the window with them.
    let day1 = block_on(sim.next_day(&filters));
    assert_eq!(day1.date, start() + Duration::days(1));
    assert_eq!(day1.answered, 5);
    assert!(day1.level_counts[0] <= 4, "{:?}", day1.level_counts);
    assert_eq!(day1.level_counts.iter().sum::<usize>(), 10);
    assert_eq!(day1.pending_writes, 0);

    let practiced: u32 = sim
        .session()
        .store()
        .records()
        .iter()
        .map(|record| record.learning_state().practice_count)
        .sum();
    assert_eq!(practiced, 10);
}

#[test]
fn a_learner_who_is_always_wrong_stays_at_level_zero() {
    let mut sim = DailySimulation::new(
        MemoryStore::new(vocabulary(6)),
        ScoringRules::default(),
        ConstantLearner(false),
        start(),
        1,
        20,
    );
    for _ in 0..3 {
        let day = block_on(sim.next_day(&PracticeFilters::default()));
        assert_eq!(day.answered, 20);
        assert_eq!(day.correct, 0);
        assert_eq!(day.level_counts, [6, 0, 0, 0, 0]);
    }
}

#[test]
fn scores_climb_over_a_month() {
    let mut sim = DailySimulation::new(
        MemoryStore::new(vocabulary(20)),
        ScoringRules::default(),
        SeededLearner::new(42),
        start(),
        42,
        30,
    );
    let filters = PracticeFilters::default();
    let days: Vec<_> = (0..30).map(|_| block_on(sim.next_day(&filters))).collect();

    for day in &days {
        assert_eq!(day.level_counts.iter().sum::<usize>(), 20);
    }
    let first = &days[0];
    let last = &days[29];
    assert!(last.level_counts[0] < first.level_counts[0]);
    assert!(last.level_counts[4] > 0);
    assert_eq!(sim.now(), start() + Duration::days(29) + Duration::minutes(30));
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut sim = DailySimulation::new(
            MemoryStore::new(vocabulary(12)),
            ScoringRules::default(),
            SeededLearner::new(seed),
            start(),
            seed,
            8,
        );
        (0..5)
            .map(|_| block_on(sim.next_day(&PracticeFilters::default())))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(3), run(3));
}
