//! Unit tests for sl-store.

use std::sync::Arc;

use sl_core::{FixedClock, HostClock, HostLifecycle, LogError, TextFormat};

use crate::{ExportKind, ExportMode, LogStore, LogStoreBuilder, MetaColumns, RowAdvance};

// ── Helpers ───────────────────────────────────────────────────────────────────

const NOW: &str = "2026-10-19 12:00:00.0000";

fn bare(mode: ExportMode) -> LogStore {
    LogStoreBuilder::new("test")
        .mode(mode)
        .meta_columns(MetaColumns::None)
        .build()
}

fn with_meta(mode: ExportMode, clock: Arc<FixedClock>) -> LogStore {
    LogStoreBuilder::new("test")
        .mode(mode)
        .session_id("session-1")
        .email("player@example.com")
        .clock(clock as Arc<dyn HostClock>)
        .build()
}

fn names(store: &LogStore) -> Vec<&str> {
    store.headers().collect()
}

fn assert_aligned(store: &LogStore) {
    for column in store.columns() {
        assert_eq!(
            column.len(),
            store.nb_lines(),
            "column `{}` has {} entries, table has {} rows",
            column.name(),
            column.len(),
            store.nb_lines()
        );
    }
}

// ── Rows and schema drift ─────────────────────────────────────────────────────

#[cfg(test)]
mod rows {
    use super::*;

    #[test]
    fn late_column_is_backfilled() {
        let mut s = bare(ExportMode::Buffered);
        s.add_field("x", 1).unwrap();
        s.add_field("y", 2).unwrap();
        s.terminate_row().unwrap();
        s.add_field("z", 3).unwrap();
        s.terminate_row().unwrap();

        assert_eq!(names(&s), ["x", "y", "z"]);
        assert_eq!(s.nb_lines(), 2);
        let snap = s.export_snapshot().unwrap();
        assert_eq!(snap.row(0).unwrap(), ["1", "2", "NULL"]);
        assert_eq!(snap.row(1).unwrap(), ["NULL", "NULL", "3"]);
        assert_eq!(s.export_text().unwrap(), "1;2;NULL\nNULL;NULL;3\n");
    }

    #[test]
    fn backfill_holds_k_nulls_then_value() {
        let mut s = bare(ExportMode::Buffered);
        for i in 0..5 {
            s.add_field("a", i).unwrap();
            s.terminate_row().unwrap();
        }
        s.add_field("late", "here").unwrap();
        // Created and padded before the row is committed.
        assert_eq!(s.column("late").unwrap().len(), 5);
        s.terminate_row().unwrap();

        let late = s.column("late").unwrap();
        assert_eq!(late.len(), 6);
        assert!((0..5).all(|i| late.is_null(i)));
        assert_eq!(late.get(5), Some("here"));
        assert_aligned(&s);
    }

    #[test]
    fn duplicate_field_is_rejected_without_side_effects() {
        let mut s = bare(ExportMode::Buffered);
        s.add_field("a", 1).unwrap();
        let err = s.add_field("a", 2).unwrap_err();
        assert!(matches!(err, LogError::AlreadyStaged { ref column } if column == "a"));
        assert_eq!(s.pending_value("a"), Some("1"));
        assert_eq!(s.nb_lines(), 0);
    }

    #[test]
    fn add_or_advance_row_commits_on_repeated_key() {
        let mut s = bare(ExportMode::Buffered);
        assert_eq!(s.add_or_advance_row("step", 1).unwrap(), RowAdvance::Staged);
        assert_eq!(s.add_or_advance_row("note", "a").unwrap(), RowAdvance::Staged);
        assert_eq!(s.add_or_advance_row("step", 2).unwrap(), RowAdvance::Advanced);
        assert_eq!(s.nb_lines(), 1);
        assert_eq!(s.pending_value("step"), Some("2"));

        assert_eq!(s.export_text().unwrap(), "1;a\n2;NULL\n");
    }

    #[test]
    fn discard_pending_keeps_committed_rows() {
        let mut s = bare(ExportMode::Buffered);
        s.add_field("a", 1).unwrap();
        s.terminate_row().unwrap();
        s.add_field("a", 2).unwrap();
        s.add_field("b", 3).unwrap();

        s.discard_pending();
        assert_eq!(s.pending_len(), 0);
        assert_eq!(s.nb_lines(), 1);
        assert_aligned(&s);

        s.add_field("a", 4).unwrap();
        assert_eq!(s.export_text().unwrap(), "1;NULL\n4;NULL\n");
    }

    #[test]
    fn terminate_without_fields_is_noop() {
        let mut s = with_meta(ExportMode::Buffered, Arc::new(FixedClock::new(NOW, 1)));
        assert!(!s.terminate_row().unwrap());
        s.add_field("a", 1).unwrap();
        assert!(s.terminate_row().unwrap());
        assert!(!s.terminate_row().unwrap());
        assert_eq!(s.nb_lines(), 1);
    }

    #[test]
    fn empty_column_name_is_rejected() {
        let mut s = bare(ExportMode::Buffered);
        assert!(matches!(s.add_field("", 1), Err(LogError::EmptyColumnName)));
        assert!(s.columns().is_empty());
    }

    #[test]
    fn values_are_formatted_on_add() {
        let mut s = bare(ExportMode::Buffered);
        s.add_field("f", 3.14159_f32).unwrap();
        s.add_field("b", true).unwrap();
        s.add_field("v", sl_core::Vec3::new(1.0, 2.0, 3.0)).unwrap();
        s.terminate_row().unwrap();
        assert_eq!(
            s.export_text().unwrap(),
            "3.1416;TRUE;(1.0000, 2.0000, 3.0000)\n"
        );
    }

    #[test]
    fn pre_registered_columns_keep_header_order() {
        let mut s = bare(ExportMode::Buffered);
        s.add_columns(["b", "a"]).unwrap();
        s.add_field("a", 1).unwrap();
        s.terminate_row().unwrap();
        assert_eq!(s.header_line().unwrap(), "b;a");
        assert_eq!(s.export_text().unwrap(), "NULL;1\n");
    }
}

// ── Metadata columns ──────────────────────────────────────────────────────────

#[cfg(test)]
mod metadata {
    use super::*;

    #[test]
    fn common_columns_lead_the_header() {
        let clock = Arc::new(FixedClock::new(NOW, 41));
        let mut s = with_meta(ExportMode::Buffered, Arc::clone(&clock));
        assert_eq!(names(&s), ["Timestamp", "Framecount", "SessionID", "Email"]);

        s.add_field("speed", 2.5_f32).unwrap();
        s.terminate_row().unwrap();
        clock.on_frame();
        s.add_field("speed", 3.0_f32).unwrap();
        s.terminate_row().unwrap();

        assert_eq!(
            s.export_text().unwrap(),
            format!(
                "{NOW};41;session-1;player@example.com;2.5000\n\
                 {NOW};42;session-1;player@example.com;3.0000\n"
            )
        );
    }

    #[test]
    fn caller_value_for_metadata_column_wins() {
        let mut s = with_meta(ExportMode::Buffered, Arc::new(FixedClock::new(NOW, 1)));
        s.add_field("Email", "override@example.com").unwrap();
        s.terminate_row().unwrap();
        assert_eq!(s.column("Email").unwrap().get(0), Some("override@example.com"));
        assert_aligned(&s);
    }

    #[test]
    fn device_variant_records_device_id() {
        let mut s = LogStoreBuilder::new("Meta")
            .meta_columns(MetaColumns::Device)
            .session_id("s")
            .device_id("dev-9")
            .clock(Arc::new(FixedClock::new(NOW, -1)))
            .build();
        s.add_field("Note", "start").unwrap();
        s.terminate_row().unwrap();
        assert_eq!(s.header_line().unwrap(), "Timestamp;Framecount;SessionID;DeviceID;Note");
        assert_eq!(s.export_text().unwrap(), format!("{NOW};-1;s;dev-9;start\n"));
    }

    #[test]
    fn session_and_email_changes_apply_to_later_rows() {
        let mut s = with_meta(ExportMode::Buffered, Arc::new(FixedClock::new(NOW, 1)));
        s.add_field("a", 1).unwrap();
        s.terminate_row().unwrap();
        s.set_session_id("session-2");
        s.set_email("x@y.z");
        s.add_field("a", 2).unwrap();
        s.terminate_row().unwrap();

        let sessions: Vec<_> = s.column("SessionID").unwrap().values().collect();
        assert_eq!(sessions, ["session-1", "session-2"]);
        let emails: Vec<_> = s.column("Email").unwrap().values().collect();
        assert_eq!(emails, ["player@example.com", "x@y.z"]);
    }

    #[test]
    fn random_session_id_when_unset() {
        let s = LogStoreBuilder::new("x").build();
        assert_eq!(s.session_id().len(), 36);
    }
}

// ── Clear ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clear {
    use super::*;

    #[test]
    fn clear_drops_rows_and_schema() {
        let mut s = bare(ExportMode::Buffered);
        for i in 0..5 {
            s.add_field("old", i).unwrap();
            s.terminate_row().unwrap();
        }
        s.add_field("old", 99).unwrap();
        s.clear();

        assert_eq!(s.nb_lines(), 0);
        assert_eq!(s.pending_len(), 0);
        assert!(s.columns().iter().all(|c| c.is_empty()));
        assert!(s.column("old").is_none());

        s.add_field("old", 7).unwrap();
        s.terminate_row().unwrap();
        assert_eq!(s.column("old").unwrap().len(), 1);
        assert_eq!(s.export_text().unwrap(), "7\n");
    }

    #[test]
    fn clear_keeps_metadata_columns_registered() {
        let mut s = with_meta(ExportMode::Streaming, Arc::new(FixedClock::new(NOW, 1)));
        s.add_field("a", 1).unwrap();
        s.terminate_row().unwrap();
        s.clear();

        assert_eq!(names(&s), ["Timestamp", "Framecount", "SessionID", "Email"]);
        assert!(s.columns().iter().all(|c| c.is_empty()));
        assert_eq!(s.export_text().unwrap(), "");
        // A cleared streaming store accepts a fresh schema.
        s.add_field("b", 2).unwrap();
        s.terminate_row().unwrap();
        assert_eq!(names(&s).last(), Some(&"b"));
    }
}

// ── Export ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod export {
    use super::*;

    fn fill(s: &mut LogStore) {
        for i in 0..3 {
            s.add_field("i", i).unwrap();
            s.add_field("even", i % 2 == 0).unwrap();
            s.terminate_row().unwrap();
        }
    }

    #[test]
    fn buffered_export_is_idempotent() {
        let mut s = bare(ExportMode::Buffered);
        fill(&mut s);
        let first = s.export_text().unwrap();
        assert_eq!(first, s.export_text().unwrap());
        assert_eq!(first.lines().count(), 3);
    }

    #[test]
    fn streaming_matches_buffered_without_drift() {
        let clock = Arc::new(FixedClock::new(NOW, 5));
        let mut buffered = with_meta(ExportMode::Buffered, Arc::clone(&clock));
        let mut streaming = with_meta(ExportMode::Streaming, clock);
        fill(&mut buffered);
        fill(&mut streaming);

        assert_eq!(buffered.header_line().unwrap(), streaming.header_line().unwrap());
        assert_eq!(buffered.export_text().unwrap(), streaming.export_text().unwrap());
    }

    #[test]
    fn export_commits_pending_row() {
        let mut s = bare(ExportMode::Streaming);
        s.add_field("a", 1).unwrap();
        assert_eq!(s.export_text().unwrap(), "1\n");
        assert_eq!(s.nb_lines(), 1);

        let mut b = bare(ExportMode::Buffered);
        b.add_field("a", 1).unwrap();
        let snap = b.export_snapshot().unwrap();
        assert_eq!(snap.nb_lines(), 1);
        assert_eq!(b.pending_len(), 0);
    }

    #[test]
    fn empty_string_is_an_empty_field() {
        for mode in [ExportMode::Buffered, ExportMode::Streaming] {
            let mut s = bare(mode);
            s.add_field("a", "").unwrap();
            s.terminate_row().unwrap();
            s.add_field("a", "x").unwrap();
            s.terminate_row().unwrap();
            assert_eq!(s.export_text().unwrap(), "\nx\n", "{mode:?}");
            assert_eq!(s.header_line().unwrap(), "a");
        }
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let mut s = bare(ExportMode::Buffered);
        fill(&mut s);
        let snap = s.export_snapshot().unwrap();

        s.add_field("new", 1).unwrap();
        s.terminate_row().unwrap();
        s.clear();

        assert_eq!(snap.nb_lines(), 3);
        assert_eq!(snap.headers().collect::<Vec<_>>(), ["i", "even"]);
        assert_eq!(snap.body_text().unwrap(), "0;TRUE\n1;FALSE\n2;TRUE\n");
        assert_eq!(snap.to_text().unwrap(), "i;even\n0;TRUE\n1;FALSE\n2;TRUE\n");
    }

    #[test]
    fn snapshot_columns_are_aligned() {
        let mut s = bare(ExportMode::Buffered);
        s.add_field("a", 1).unwrap();
        s.terminate_row().unwrap();
        s.add_field("b", 2).unwrap();
        let snap = s.export_snapshot().unwrap();
        assert!(snap.columns().iter().all(|c| c.len() == snap.nb_lines()));
        assert!(snap.row(2).is_none());
    }

    #[test]
    fn export_by_kind() {
        let mut s = bare(ExportMode::Buffered);
        fill(&mut s);
        let table = s.export(ExportKind::Table).unwrap();
        assert_eq!(table.kind(), ExportKind::Table);
        assert_eq!(table.into_table().unwrap().nb_lines(), 3);

        let text = s.export_named("TEXT").unwrap().into_text().unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn unsupported_export_fails_fast() {
        let mut s = bare(ExportMode::Buffered);
        s.add_field("a", 1).unwrap();
        let err = s.export_named("dictionary").unwrap_err();
        assert!(matches!(err, LogError::UnsupportedExport(ref k) if k == "dictionary"));
        // Nothing was committed by the failed call.
        assert_eq!(s.nb_lines(), 0);
        assert_eq!(s.pending_len(), 1);
    }

    #[test]
    fn custom_separator() {
        let mut s = LogStoreBuilder::new("csv")
            .meta_columns(MetaColumns::None)
            .format(TextFormat::with_separator(b','))
            .build();
        s.add_field("a", 1).unwrap();
        s.add_field("b", 2).unwrap();
        assert_eq!(s.export_snapshot().unwrap().to_text().unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn text_reads_back_as_delimited_records() {
        let mut s = with_meta(ExportMode::Buffered, Arc::new(FixedClock::new(NOW, 3)));
        fill(&mut s);
        s.add_field("late", "x").unwrap();
        let text = s.export_snapshot().unwrap().to_text().unwrap();

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(text.as_bytes());
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["Timestamp", "Framecount", "SessionID", "Email", "i", "even", "late"]);
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == 7));
        assert_eq!(&rows[0][6], "NULL");
        assert_eq!(&rows[3][6], "x");
        assert_eq!(&rows[3][4], "NULL");
    }
}

// ── Streaming drift policy ────────────────────────────────────────────────────

#[cfg(test)]
mod streaming {
    use super::*;

    #[test]
    fn new_column_before_first_row_is_allowed() {
        let mut s = bare(ExportMode::Streaming);
        s.add_field("a", 1).unwrap();
        s.add_field("b", 2).unwrap();
        s.terminate_row().unwrap();
        assert_eq!(s.export_text().unwrap(), "1;2\n");
    }

    #[test]
    fn drift_after_streaming_is_rejected_and_text_survives() {
        let mut s = bare(ExportMode::Streaming);
        s.add_field("a", 1).unwrap();
        s.terminate_row().unwrap();

        let err = s.add_field("b", 2).unwrap_err();
        assert!(matches!(
            err,
            LogError::SchemaDrift { ref column, committed_rows: 1 } if column == "b"
        ));
        assert!(s.column("b").is_none());
        assert_eq!(s.pending_len(), 0);

        // Known columns keep working.
        s.add_field("a", 2).unwrap();
        s.terminate_row().unwrap();
        assert_eq!(s.export_text().unwrap(), "1\n2\n");
        assert_eq!(s.mode(), ExportMode::Streaming);
    }

    #[test]
    fn add_column_respects_drift_policy() {
        let mut s = bare(ExportMode::Streaming);
        s.add_field("a", 1).unwrap();
        s.terminate_row().unwrap();
        assert!(matches!(s.add_column("b"), Err(LogError::SchemaDrift { .. })));
        s.add_column("a").unwrap();
    }

    #[test]
    fn buffered_store_accepts_same_drift() {
        let mut s = bare(ExportMode::Buffered);
        s.add_field("a", 1).unwrap();
        s.terminate_row().unwrap();
        s.add_field("b", 2).unwrap();
        s.terminate_row().unwrap();
        assert_eq!(s.export_text().unwrap(), "1;NULL\nNULL;2\n");
    }

    #[test]
    fn streamed_snapshot_carries_text() {
        let mut s = bare(ExportMode::Streaming);
        s.add_field("a", 1).unwrap();
        let snap = s.export_snapshot().unwrap();
        assert_eq!(snap.mode(), ExportMode::Streaming);
        assert_eq!(snap.to_text().unwrap(), "a\n1\n");
    }
}

// ── Property tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    #[derive(Clone, Debug)]
    enum Op {
        Add(usize, i32),
        Advance(usize, i32),
        Terminate,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..6, any::<i32>()).prop_map(|(c, v)| Op::Add(c, v)),
            (0usize..6, any::<i32>()).prop_map(|(c, v)| Op::Advance(c, v)),
            Just(Op::Terminate),
        ]
    }

    proptest! {
        #[test]
        fn columns_always_match_row_count(ops in prop::collection::vec(op(), 0..64)) {
            let mut s = LogStoreBuilder::new("prop")
                .clock(Arc::new(FixedClock::new(NOW, 0)))
                .build();
            for op in ops {
                match op {
                    Op::Add(c, v) => { let _ = s.add_field(&format!("c{c}"), v); }
                    Op::Advance(c, v) => { s.add_or_advance_row(&format!("c{c}"), v).unwrap(); }
                    Op::Terminate => { s.terminate_row().unwrap(); }
                }
                for column in s.columns() {
                    prop_assert_eq!(column.len(), s.nb_lines());
                }
            }
            let rows = s.nb_lines() + usize::from(s.pending_len() > 0);
            let text = s.export_text().unwrap();
            prop_assert_eq!(text.lines().count(), rows);
            let width = s.columns().len();
            for line in text.lines() {
                prop_assert_eq!(line.split(';').count(), width);
            }
        }
    }
}
