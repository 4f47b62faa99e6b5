//! Property-based tests for multiwriter_logger using proptest

use multiwriter_logger::prelude::*;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn any_severity() -> impl Strategy<Value = Severity> {
    (0u8..=8).prop_map(|v| Severity::from_value(v).expect("value in range"))
}

#[derive(Default)]
struct Collect(Mutex<Vec<(Severity, String)>>);

impl Backend for Collect {
    fn init(&self, _config: &str) -> Result<()> {
        Ok(())
    }

    fn write(&self, level: Severity, message: &str) -> Result<()> {
        self.0.lock().push((level, message.to_string()));
        Ok(())
    }

    fn destroy(&self) {}

    fn name(&self) -> &str {
        "collect"
    }
}

fn logger_with_collector(level: Severity) -> (Logger, Arc<Collect>) {
    let logger = Logger::builder()
        .level(level)
        .prefix("p")
        .registry(Arc::new(BackendRegistry::new()))
        .default_console(false)
        .build()
        .expect("Failed to build logger");
    let collect = Arc::new(Collect::default());
    logger.add_writer("collect", collect.clone(), "").unwrap();
    (logger, collect)
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Ordering agrees with the numeric value
    #[test]
    fn test_severity_ordering(a in any_severity(), b in any_severity()) {
        prop_assert_eq!(a <= b, a.value() <= b.value());
        prop_assert_eq!(a.is_at_least(b), a.value() <= b.value());
    }

    /// Tags parse back to the same severity
    #[test]
    fn test_severity_tag_roundtrip(level in any_severity()) {
        let parsed: Severity = level.as_str().parse().unwrap();
        prop_assert_eq!(parsed, level);
        prop_assert_eq!(level.to_string(), level.as_str());
    }

    /// Raw values outside the enumeration have an empty tag
    #[test]
    fn test_unknown_values_have_empty_tag(value in 9u8..) {
        prop_assert_eq!(Severity::tag_for(value), "");
    }
}

// ============================================================================
// Dispatch Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A message is delivered iff it is at least as severe as the threshold
    #[test]
    fn test_threshold_admission(level in any_severity(), threshold in any_severity()) {
        let (logger, collect) = logger_with_collector(threshold);
        logger.log(level, "m");
        let delivered = !collect.0.lock().is_empty();
        prop_assert_eq!(delivered, level.value() <= threshold.value());
    }

    /// Async delivery preserves single-producer submission order
    #[test]
    fn test_async_order_preserved(levels in prop::collection::vec(any_severity(), 1..200)) {
        let (logger, collect) = logger_with_collector(Severity::Debug);
        logger.set_async(true).unwrap();
        for (i, level) in levels.iter().enumerate() {
            logger.log(*level, i.to_string());
        }
        prop_assert!(logger.manager().stop_dispatcher(Duration::from_secs(5)));

        let got = collect.0.lock().clone();
        let expected: Vec<(Severity, String)> = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (*level, format!("[p]{}", i)))
            .collect();
        prop_assert_eq!(got, expected);
    }

    /// Backend names are case-insensitive for attach and remove
    #[test]
    fn test_writer_names_case_insensitive(name in "[a-zA-Z]{1,12}") {
        let (logger, _collect) = logger_with_collector(Severity::Debug);
        logger.add_writer(&name, Arc::new(Collect::default()), "").unwrap();
        prop_assert!(logger.manager().has_writer(&name.to_uppercase()));
        logger.remove_writer(&name.to_lowercase()).unwrap();
        prop_assert!(!logger.manager().has_writer(&name));
    }
}
