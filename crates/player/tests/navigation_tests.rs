//! Integration tests for chapter navigation
//!
//! These tests drive the navigator the way the chapter controller does:
//! through `advance` on the cursor and the pure `next`/`previous` queries.

use bookplay_core::{BookMetadata, Chapter, SkipDirection};
use bookplay_player::ChapterSequence;

fn book() -> Vec<Chapter> {
    let json = r#"{
        "bookName": "Essentialism",
        "keyPoints": [
            { "title": "A", "fileUrl": "https://cdn.example.com/a.mp3", "text": "Less but better" },
            { "title": "B", "fileUrl": "https://cdn.example.com/b.mp3", "text": "Explore" },
            { "title": "C", "fileUrl": "https://cdn.example.com/c.mp3", "text": "Execute" }
        ]
    }"#;
    BookMetadata::from_json(json)
        .expect("Failed to parse book")
        .into_chapters()
}

#[test]
fn test_forward_skips_with_wrap() {
    let mut sequence = ChapterSequence::new(book());

    sequence.advance(SkipDirection::Forward, true);
    let second = sequence
        .advance(SkipDirection::Forward, true)
        .expect("Second skip failed");
    assert_eq!(second.title, "C");

    let third = sequence
        .advance(SkipDirection::Forward, true)
        .expect("Third skip failed");
    assert_eq!(third.title, "A");
}

#[test]
fn test_backward_skips_with_wrap() {
    let mut sequence = ChapterSequence::new(book());

    let wrapped = sequence
        .advance(SkipDirection::Backward, true)
        .expect("Backward wrap failed");
    assert_eq!(wrapped.title, "C");
    assert_eq!(sequence.progress_label().as_deref(), Some("KEY POINT 3 OF 3"));
}

#[test]
fn test_walk_to_end_without_wrap() {
    let mut sequence = ChapterSequence::new(book());
    let mut visited = vec![sequence.current().expect("No first chapter").title.clone()];

    while let Some(chapter) = sequence.advance(SkipDirection::Forward, false) {
        visited.push(chapter.title.clone());
    }

    assert_eq!(visited, vec!["A", "B", "C"]);
    assert_eq!(sequence.current_index(), Some(2));
}

#[test]
fn test_queries_match_cursor_moves() {
    let chapters = book();
    let mut sequence = ChapterSequence::new(chapters.clone());

    for wrap in [false, true] {
        for chapter in &chapters {
            let idx = sequence.index_of(chapter).expect("Chapter missing") - 1;
            sequence.select(idx);

            let expected = sequence.next(chapter, wrap).cloned();
            let moved = sequence.advance(SkipDirection::Forward, wrap).cloned();
            assert_eq!(moved, expected, "next from {} (wrap {})", chapter.title, wrap);

            sequence.select(idx);
            let expected = sequence.previous(chapter, wrap).cloned();
            let moved = sequence.advance(SkipDirection::Backward, wrap).cloned();
            assert_eq!(moved, expected, "previous from {} (wrap {})", chapter.title, wrap);
        }
    }
}

#[test]
fn test_replacing_sequence_resets_cursor() {
    let mut sequence = ChapterSequence::new(book());
    sequence.select(2);

    sequence = ChapterSequence::new(vec![Chapter::new("Solo", "https://cdn.example.com/s.mp3", "")]);
    assert_eq!(sequence.current_index(), Some(0));
    assert_eq!(sequence.len(), 1);
}
