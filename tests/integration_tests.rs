//! Integration tests for the tab engine
//!
//! Runs whole documents through annotation, transposition, wrapping and
//! placement through the public API only.

use tabtext::layout::{
    place, FixedMarkerMetrics, LineGeometryProvider, MarkerConfig, MonospaceLayout,
};
use tabtext::scanner::find_tab_blocks;
use tabtext::wrap::visible_width;
use tabtext::{
    annotate, find_next_chord_tag, render, render_text, transpose, transpose_markup,
    AnnotationKind, ChordAnnotation, EngineConfig, LineWrapEngine, TabWarning, TagSyntax,
};

const SONG: &str = "Capo 2, www.example.com/capo\n\
[tab][ch]C[/ch]   [ch]Am[/ch]\n\
That David played[/tab]\n\
Bridge: {ch:F} then [ch]G7[/ch]\n\
[tab][ch]F[/ch]       [ch]G[/ch]\n\
And it goes like this[/tab]";

#[test]
fn test_chord_line_over_lyrics_scenario() {
    let result = annotate("[tab][ch]C[/ch]   [ch]Am[/ch]\nThat David played[/tab]");

    assert_eq!(result.blocks.len(), 1);
    let block = &result.blocks[0];
    assert!(block.is_tab_block);
    assert_eq!(result.chords.sorted(), vec!["Am", "C"]);

    let values: Vec<String> = block
        .content
        .chords
        .iter()
        .map(|c| c.kind.wire_value())
        .collect();
    assert_eq!(values, vec!["C", "Am"]);
    assert!(block.content.chords.iter().all(|c| !c.kind.is_inline()));
}

#[test]
fn test_transpose_scenario() {
    assert_eq!(transpose("G#", 1), "A");
    assert_eq!(transpose("A", -1), "G#");
}

#[test]
fn test_find_chord_tag_scenario() {
    let found = find_next_chord_tag("{ch:Em} hello", 0).unwrap();
    assert_eq!(found.chord_name, "Em");
    assert_eq!(found.start, 0);
    assert_eq!(found.end, 7);
    assert_eq!(found.syntax, TagSyntax::Brace);
}

#[test]
fn test_tag_removal_completeness() {
    let result = annotate(SONG);
    let text = result.joined_text();

    assert!(!text.contains("[ch]"));
    assert!(!text.contains("[/ch]"));
    assert!(!text.contains("{ch:"));
    assert!(!text.contains("[tab]"));

    // 6 tags, 5 distinct names.
    assert_eq!(result.chords.sorted(), vec!["Am", "C", "F", "G", "G7"]);
    let annotations: usize = result.blocks.iter().map(|b| b.content.chords.len()).sum();
    assert_eq!(annotations, 6);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_annotation_is_idempotent() {
    assert_eq!(annotate(SONG), annotate(SONG));
}

#[test]
fn test_blocks_follow_document_order() {
    let result = annotate(SONG);
    let kinds: Vec<bool> = result.blocks.iter().map(|b| b.is_tab_block).collect();
    assert_eq!(kinds, vec![false, true, false, true]);

    assert_eq!(find_tab_blocks(SONG).len(), 2);
    assert_eq!(result.blocks[0].content.links.len(), 1);
    assert_eq!(result.blocks[0].content.links[0].url, "www.example.com/capo");

    // Chords in prose never raise a character.
    assert!(result.blocks[2]
        .content
        .chords
        .iter()
        .all(|c| c.kind.is_inline()));
}

#[test]
fn test_transpose_markup_round_trip() {
    let markup = "[tab][ch]C#m7[/ch]a {ch:F#}b [ch]A/E[/ch]c[/tab]";
    let up = transpose_markup(markup, 5);
    assert_eq!(up, "[tab][ch]F#m7[/ch]a {ch:B}b [ch]D/E[/ch]c[/tab]");
    assert_eq!(transpose_markup(&up, -5), markup);
}

#[test]
fn test_malformed_markup_never_drops_content() {
    let result = annotate("[tab]la [ch]C and {ch:D la[/tab] tail");
    let text = result.joined_text();
    assert!(text.contains("[ch]C and {ch:D la"));
    assert!(text.ends_with(" tail"));
    assert!(result.chords.is_empty());
    assert_eq!(
        result.warnings,
        vec![
            TabWarning::UnclosedChordTag { offset: 8 },
            TabWarning::UnclosedChordTag { offset: 18 },
        ]
    );
}

#[test]
fn test_wrap_width_respected() {
    let chord_line = "[ch]C[/ch]    [ch]G[/ch]     [ch]Am[/ch]   [ch]F[/ch]";
    let lyric_line = "When I find myself in times of trouble";

    for width in [6, 10, 17, 25] {
        let mut engine = LineWrapEngine::new(width);
        let lines = engine.wrap_pair(chord_line, Some(lyric_line));

        assert_eq!(lines.len() % 2, 0);
        assert!(engine.warnings().is_empty());
        for line in &lines {
            assert!(
                visible_width(line) <= width,
                "'{}' is wider than {}",
                line,
                width
            );
        }
    }
}

#[test]
fn test_wrap_hard_cut_reports_warning() {
    let mut engine = LineWrapEngine::new(3);
    let lines = engine.wrap_pair("[ch]Cmaj7sus4[/ch]", Some("la"));
    assert!(!lines.is_empty());
    assert!(matches!(engine.warnings()[0], TabWarning::HardWrap { .. }));
}

#[test]
fn test_placements_never_overlap() {
    let result = annotate("[tab][ch]C[/ch][ch]Cmaj7[/ch][ch]D[/ch]la la\n[ch]E[/ch]x [ch]B7[/ch]y[/tab]");
    let content = &result.blocks[0].content;
    let layout = MonospaceLayout::new(&content.text, 8.0, 30.0);
    let metrics = FixedMarkerMetrics {
        char_width: 8.0,
        height: 18.0,
        padding: 3.0,
    };
    let placements = place(&content.chords, &layout, &metrics, &MarkerConfig::default());

    assert_eq!(placements.len(), content.chords.len());
    for (i, pair) in placements.windows(2).enumerate() {
        let line = |j: usize| layout.line_for_offset(content.chords[j].start);
        if line(i) == line(i + 1) {
            assert!(pair[1].x >= pair[0].right());
        }
    }
}

#[test]
fn test_inline_markers_sit_lower_than_raised() {
    let result = annotate("[tab][ch]C[/ch]a[ch]D[/ch][/tab]");
    let content = &result.blocks[0].content;
    assert_eq!(
        content.chords,
        vec![
            ChordAnnotation {
                kind: AnnotationKind::Raised("C".into()),
                start: 0,
                end: 1,
            },
            ChordAnnotation {
                kind: AnnotationKind::Inline("D".into()),
                start: 1,
                end: 2,
            },
        ]
    );

    let layout = MonospaceLayout::new(&content.text, 10.0, 40.0);
    let metrics = FixedMarkerMetrics {
        char_width: 10.0,
        height: 20.0,
        padding: 0.0,
    };
    let placements = place(&content.chords, &layout, &metrics, &MarkerConfig::default());
    assert_eq!(placements[0].y, 5.0);
    assert_eq!(placements[1].y, 20.0);
}

#[test]
fn test_render_from_yaml_config() {
    let config = EngineConfig::from_yaml("transpose: -2\nlegacy-wrap: true\nwrap-width: 12\n").unwrap();
    let rendered = render(SONG, &config);

    assert_eq!(rendered.chords.sorted(), vec!["A#", "D#", "F", "F7", "Gm"]);
    let wrapped = rendered.wrapped.as_ref().unwrap();
    assert_eq!(wrapped.len(), 2);
    assert_eq!(wrapped[0].block_index, 1);
    assert_eq!(wrapped[1].block_index, 3);
    for block in wrapped {
        assert!(block.lines.iter().all(|l| visible_width(l) <= 12));
    }

    let text = render_text(&rendered);
    assert!(text.starts_with("Capo 2, www.example.com/capo\n"));
    assert!(text.contains("Bridge: [D#] then [F7]"));
}

#[test]
fn test_render_text_default_view() {
    let rendered = render(SONG, &EngineConfig::default());
    let text = render_text(&rendered);
    assert!(text.contains("C  Am\nThat David played"));
    assert!(text.contains("F      G\nAnd it goes like this"));
}

#[test]
fn test_render_warnings_stable_under_transpose() {
    let markup = "{ch:N.C.} [ch]C[/ch][ch]C[/ch] x [ch]D never";
    let plain = render(markup, &EngineConfig::default());
    assert_eq!(plain.warnings, vec![TabWarning::UnclosedChordTag { offset: 33 }]);

    for steps in [1, -3, 12] {
        let config = EngineConfig {
            transpose: steps,
            ..EngineConfig::default()
        };
        let shifted = render(markup, &config);
        assert_eq!(
            shifted.warnings,
            vec![
                TabWarning::UnknownChordRoot {
                    chord: "N.C.".to_string()
                },
                TabWarning::UnclosedChordTag { offset: 33 },
            ]
        );
        assert_eq!(shifted.blocks[0].content.text, plain.blocks[0].content.text);
    }
}

#[test]
fn test_render_yaml_places_markers() {
    let config = EngineConfig::from_yaml("place-markers: true\ngrid:\n  cell-width: 8\n").unwrap();
    let rendered = render(SONG, &config);
    let placements = rendered.placements.as_ref().unwrap();

    // The opening "Capo 2" block has no chords and gets no entry.
    let indices: Vec<usize> = placements.iter().map(|b| b.block_index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
    for block in placements {
        let chords = &rendered.blocks[block.block_index].content.chords;
        assert_eq!(block.placements.len(), chords.len());
        for pair in block.placements.windows(2) {
            assert!(pair[1].x >= pair[0].right());
        }
    }
}
