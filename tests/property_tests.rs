//! Property-based tests for channel_logger using proptest

use channel_logger::handlers::{MemoryBuffer, MemorySink, SinkHandler};
use channel_logger::prelude::*;
use channel_logger::registry::LoggingConfig;
use channel_logger::{sort_by_priority, Prioritized};
use proptest::prelude::*;

fn any_severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

fn capturing_logger() -> (Logger, MemoryBuffer) {
    let buffer = MemoryBuffer::new();
    let logger = Logger::new("app");
    logger
        .push_handler(HandlerEntry::from_handler(SinkHandler::new(
            MemorySink::with_buffer(buffer.clone()),
        )))
        .unwrap();
    logger.freeze();
    (logger, buffer)
}

// ============================================================================
// Priority sort
// ============================================================================

proptest! {
    /// Output is ascending and equal priorities keep their input order
    #[test]
    fn test_sort_is_stable_and_ascending(priorities in prop::collection::vec(-5i32..5, 0..40)) {
        let entries: Vec<Prioritized<usize>> = priorities
            .iter()
            .enumerate()
            .map(|(index, priority)| Prioritized::new(*priority, index))
            .collect();

        let sorted = sort_by_priority(entries);
        prop_assert_eq!(sorted.len(), priorities.len());

        for pair in sorted.windows(2) {
            prop_assert!(pair[0].priority <= pair[1].priority);
            if pair[0].priority == pair[1].priority {
                prop_assert!(pair[0].item < pair[1].item);
            }
        }
    }

    /// Numeric tags parse to their value, anything else to zero
    #[test]
    fn test_priority_parse(value in any::<i32>(), junk in "[a-z_]{1,12}") {
        prop_assert_eq!(Priority::parse(&value.to_string()), Priority(value));
        prop_assert_eq!(Priority::parse(&junk), Priority::DEFAULT);
    }
}

// ============================================================================
// Severity
// ============================================================================

proptest! {
    #[test]
    fn test_severity_str_roundtrip(level in any_severity()) {
        let parsed: Severity = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    #[test]
    fn test_min_level_filtering(min in any_severity(), level in any_severity()) {
        let handler = SinkHandler::new(MemorySink::new()).with_min_level(min);
        prop_assert_eq!(handler.is_handling(level), level >= min);
    }
}

// ============================================================================
// Channels
// ============================================================================

proptest! {
    /// The channel name always wins over a caller-supplied `channel` key
    #[test]
    fn test_channel_name_overrides_context(
        name in "[a-z]{1,10}",
        spoofed in proptest::option::of("[a-z]{1,10}"),
        level in any_severity(),
        message in "[ -~]{0,40}",
    ) {
        let (logger, buffer) = capturing_logger();
        let mut context = Context::new();
        if let Some(spoofed) = &spoofed {
            context.insert("channel", spoofed.as_str());
        }

        logger.channel(name.as_str()).log(level, &message, context);

        let records = buffer.records();
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].channel.as_deref(), Some(name.as_str()));
        prop_assert_eq!(
            records[0].context.get("channel").and_then(FieldValue::as_str),
            Some(name.as_str())
        );
        prop_assert_eq!(records[0].level, level);
    }

    /// Formatted lines never span more than one line while the record keeps
    /// the caller's text
    #[test]
    fn test_messages_are_single_line(
        message in "[a-z \\n\\r\\t]{0,40}",
        value in "[a-z\\n\\r]{0,12}",
    ) {
        let (logger, buffer) = capturing_logger();
        logger.info(&message, Context::new().with_field("value", value.as_str()));

        let lines = buffer.lines();
        prop_assert_eq!(lines.len(), 1);
        prop_assert!(!lines[0].contains('\n'));
        prop_assert!(!lines[0].contains('\r'));
        prop_assert!(!lines[0].contains('\t'));
        prop_assert_eq!(&buffer.records()[0].message, &message);
    }
}

// ============================================================================
// Registry build
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Two builds of the same configuration attach in the same order
    #[test]
    fn test_build_is_idempotent(priorities in prop::collection::vec(-3i32..3, 1..8)) {
        let dir = tempfile::tempdir().unwrap();
        let mut body = String::from("register_fallback = false\n");
        for (index, priority) in priorities.iter().enumerate() {
            body.push_str(&format!(
                "[handlers.h{index}]\nclass = \"null\"\npriority = {priority}\n"
            ));
        }
        let mut config = LoggingConfig::from_toml_str(&body).unwrap();
        config.log_dir = Some(dir.path().to_path_buf());

        let builder = RegistryBuilder::new(config);
        let first = builder.build().unwrap();
        let second = builder.build().unwrap();

        let ids = |registry: &Registry| -> Vec<String> {
            registry.default_logger().handlers().into_iter().map(|e| e.id).collect()
        };
        prop_assert_eq!(ids(&first), ids(&second));

        let attached: Vec<i32> = first
            .default_logger()
            .handlers()
            .iter()
            .map(|e| e.priority.value())
            .collect();
        let mut expected = priorities.clone();
        expected.sort();
        prop_assert_eq!(attached, expected);
    }
}
