use crate::{
    normalize::TalkRef,
    state::{DiscoverView, ExploreView, TraceView},
};

const WHY_WATCH_PLACEHOLDER: &str = "Your compelling reason to watch will appear here...";
const RECOMMENDATIONS_PLACEHOLDER: &str = "Recommendations will appear here...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardViewModel {
    pub header: String,
    pub lines: Vec<CardLine>,
    pub selected: bool,
    /// Timeline cards alternate sides.
    pub align_right: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLine {
    pub indent: usize,
    pub highlighted: bool,
    pub segments: Vec<CardSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSegment {
    pub text: String,
    pub style: SegmentStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    Plain,
    Title,
    Speaker,
    Category,
    Tag,
    Date,
    Link,
    Muted,
    Quote,
}

impl CardLine {
    fn new(indent: usize, segments: Vec<CardSegment>) -> Self {
        Self {
            indent,
            highlighted: false,
            segments,
        }
    }

    fn single(indent: usize, text: impl Into<String>, style: SegmentStyle) -> Self {
        Self::new(indent, vec![segment(text, style)])
    }

    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect()
    }
}

fn segment(text: impl Into<String>, style: SegmentStyle) -> CardSegment {
    CardSegment {
        text: text.into(),
        style,
    }
}

fn talk_lines(talk: &TalkRef, indent: usize) -> Vec<CardLine> {
    let mut lines = vec![CardLine::single(indent, talk.title.clone(), SegmentStyle::Title)];
    if let Some(speaker) = &talk.speaker {
        lines.push(CardLine::single(indent, speaker.clone(), SegmentStyle::Speaker));
    }
    lines
}

fn thumbnail_line(talk: &TalkRef, indent: usize) -> CardLine {
    CardLine::new(
        indent,
        vec![
            segment("▣ ", SegmentStyle::Muted),
            segment(talk.thumbnail.clone(), SegmentStyle::Muted),
        ],
    )
}

fn link_line(label: &str, url: &str, indent: usize) -> CardLine {
    CardLine::new(
        indent,
        vec![
            segment(format!("{} ↗ ", label), SegmentStyle::Plain),
            segment(url, SegmentStyle::Link),
        ],
    )
}

pub fn featured_talk_card(view: &ExploreView) -> Option<CardViewModel> {
    let talk = view.current_talk.as_ref()?;

    let mut lines = vec![thumbnail_line(talk, 0)];
    lines.extend(talk_lines(talk, 0));
    if !view.summary.is_empty() {
        lines.push(CardLine::single(0, view.summary.clone(), SegmentStyle::Plain));
    }
    lines.push(link_line("Watch", &talk.url, 0));

    Some(CardViewModel {
        header: "Current talk".to_string(),
        lines,
        selected: false,
        align_right: false,
    })
}

pub fn why_watch_card(view: &ExploreView) -> CardViewModel {
    let line = if view.insight.is_empty() {
        CardLine::single(0, WHY_WATCH_PLACEHOLDER, SegmentStyle::Muted)
    } else {
        CardLine::single(0, view.insight.clone(), SegmentStyle::Quote)
    };

    CardViewModel {
        header: "Why Watch?".to_string(),
        lines: vec![line],
        selected: false,
        align_right: false,
    }
}

/// Grouped recommendations. The line block of the selected talk is
/// highlighted.
pub fn recommendations_card(view: &ExploreView) -> CardViewModel {
    let mut lines = Vec::new();
    let mut flat_index = 0;

    for group in &view.recommendations {
        if !lines.is_empty() {
            lines.push(CardLine::new(0, Vec::new()));
        }
        lines.push(CardLine::single(
            0,
            format!("If you're interested in {}", group.category),
            SegmentStyle::Category,
        ));

        for talk in &group.talks {
            let mut block = vec![thumbnail_line(talk, 1)];
            block.extend(talk_lines(talk, 1));
            block.push(link_line("Watch", &talk.url, 1));

            if view.selected == Some(flat_index) {
                for line in &mut block {
                    line.highlighted = true;
                }
            }

            lines.extend(block);
            flat_index += 1;
        }
    }

    if lines.is_empty() {
        lines.push(CardLine::single(0, RECOMMENDATIONS_PLACEHOLDER, SegmentStyle::Muted));
    }

    CardViewModel {
        header: "You might also like…".to_string(),
        lines,
        selected: view.selected.is_some(),
        align_right: false,
    }
}

pub fn playlist_cards(view: &DiscoverView) -> Vec<CardViewModel> {
    view.playlist
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut lines = vec![thumbnail_line(&entry.talk, 0)];
            lines.extend(talk_lines(&entry.talk, 0));

            if !entry.tags.is_empty() {
                let mut tags = Vec::new();
                for tag in &entry.tags {
                    if !tags.is_empty() {
                        tags.push(segment(" ", SegmentStyle::Plain));
                    }
                    tags.push(segment(format!("#{}", tag), SegmentStyle::Tag));
                }
                lines.push(CardLine::new(0, tags));
            }

            lines.push(link_line("Watch Talk", &entry.talk.url, 0));

            CardViewModel {
                header: format!("#{}", index + 1),
                lines,
                selected: view.selected == Some(index),
                align_right: false,
            }
        })
        .collect()
}

pub fn timeline_cards(view: &TraceView) -> Vec<CardViewModel> {
    view.timeline
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut lines = vec![thumbnail_line(&entry.talk, 0)];
            lines.extend(talk_lines(&entry.talk, 0));
            lines.push(CardLine::single(0, entry.display_date.clone(), SegmentStyle::Date));
            lines.push(link_line("Watch", &entry.talk.url, 0));

            CardViewModel {
                header: entry.display_date.clone(),
                lines,
                selected: view.selected == Some(index),
                align_right: index % 2 == 1,
            }
        })
        .collect()
}
