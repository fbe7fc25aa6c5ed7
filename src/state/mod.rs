use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    client::{ApiError, Outcome, Request},
    clipboard::ClipboardError,
    normalize::{PlaylistEntry, RecommendationGroup, TalkRef, TimelineEntry},
    protocol::{ExploreRequest, TraceRequest},
};

/// Ticks a notice stays on screen.
pub const NOTICE_TICKS: u16 = 16;

pub const EXPLORE_FAILED: &str = "Failed to generate content. Please try again.";
pub const DISCOVER_FAILED: &str = "Failed to generate playlist. Please try again.";
pub const TRACE_FAILED: &str = "Failed to generate timeline. Please try again.";
pub const COPY_FAILED: &str = "Failed to copy to clipboard.";
pub const COPY_SUCCEEDED: &str = "Content copied to clipboard.";

/// Each tab hosts one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Tab {
    Trace,
    Explore,
    Discover,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Trace, Tab::Explore, Tab::Discover];

    pub fn index(self) -> usize {
        match self {
            Tab::Trace => 0,
            Tab::Explore => 1,
            Tab::Discover => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Trace => "Trace",
            Tab::Explore => "Explore",
            Tab::Discover => "Discover",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading {
        ticket: Uuid,
    },
}

impl Phase {
    pub fn is_loading(self) -> bool {
        matches!(self, Phase::Loading { .. })
    }

    pub fn ticket(self) -> Option<Uuid> {
        match self {
            Phase::Loading { ticket } => Some(ticket),
            Phase::Idle => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipKind {
    Mood,
    Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip {
    pub label: &'static str,
    pub kind: ChipKind,
}

const fn mood(label: &'static str) -> Chip {
    Chip {
        label,
        kind: ChipKind::Mood,
    }
}

const fn activity(label: &'static str) -> Chip {
    Chip {
        label,
        kind: ChipKind::Activity,
    }
}

pub const CHIPS: [Chip; 12] = [
    mood("Inspired"),
    mood("Nostalgic"),
    mood("Curious"),
    mood("Hopeful"),
    mood("Reflective"),
    mood("Motivated"),
    activity("Morning-coffee"),
    activity("Commuting"),
    activity("Lunch-break"),
    activity("Wind-down"),
    activity("Group-discussion"),
    activity("Workout"),
];

#[derive(Debug, Clone, Default)]
pub struct ExploreView {
    pub input: String,
    pub current_talk: Option<TalkRef>,
    pub summary: String,
    pub insight: String,
    pub recommendations: Vec<RecommendationGroup>,
    pub selected: Option<usize>,
    pub phase: Phase,
}

impl ExploreView {
    pub fn recommendation_count(&self) -> usize {
        self.recommendations.iter().map(|group| group.talks.len()).sum()
    }

    /// Recommendation by flat index across all groups.
    pub fn recommendation_at(&self, index: usize) -> Option<&TalkRef> {
        self.recommendations
            .iter()
            .flat_map(|group| group.talks.iter())
            .nth(index)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiscoverFocus {
    #[default]
    Chips,
    Custom,
}

#[derive(Debug, Clone, Default)]
pub struct DiscoverView {
    /// Indices into `CHIPS`, in toggle order.
    pub selection: Vec<usize>,
    pub chip_cursor: usize,
    pub focus: DiscoverFocus,
    pub custom: String,
    pub playlist: Vec<PlaylistEntry>,
    pub selected: Option<usize>,
    pub phase: Phase,
}

impl DiscoverView {
    pub fn is_chip_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    pub fn toggle_chip(&mut self, index: usize) {
        if index >= CHIPS.len() {
            return;
        }

        if let Some(position) = self.selection.iter().position(|&chip| chip == index) {
            self.selection.remove(position);
        } else {
            self.selection.push(index);
        }
    }

    fn selected_labels(&self, kind: Option<ChipKind>) -> Vec<&'static str> {
        self.selection
            .iter()
            .filter_map(|&index| CHIPS.get(index))
            .filter(|chip| kind.map_or(true, |kind| chip.kind == kind))
            .map(|chip| chip.label)
            .collect()
    }

    pub fn request(&self) -> crate::protocol::DiscoverRequest {
        crate::protocol::DiscoverRequest::new(
            &self.selected_labels(Some(ChipKind::Mood)),
            &self.selected_labels(Some(ChipKind::Activity)),
            &self.selected_labels(None),
            &self.custom,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct TraceView {
    pub topic: String,
    pub timeline: Vec<TimelineEntry>,
    pub selected: Option<usize>,
    pub phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub message: String,
    pub ticks_left: u16,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error",
            message: message.into(),
            ticks_left: NOTICE_TICKS,
        }
    }

    pub fn info(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title,
            message: message.into(),
            ticks_left: NOTICE_TICKS,
        }
    }
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Uuid,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub enum Action {
    SelectTab(Tab),
    NextTab,
    PreviousTab,
    Input(char),
    Backspace,
    FocusUp,
    FocusDown,
    ChipLeft,
    ChipRight,
    SelectNext,
    SelectPrevious,
    Submit,
    Completed(Completion),
    Copy,
    CopyFinished(Result<(), ClipboardError>),
    Tick,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    Dispatch { ticket: Uuid, request: Request },
    Copy(String),
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub tab: Tab,
    pub explore: ExploreView,
    pub discover: DiscoverView,
    pub trace: TraceView,
    pub notice: Option<Notice>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Tab::Trace)
    }
}

impl ViewState {
    pub fn new(tab: Tab) -> Self {
        Self {
            tab,
            explore: ExploreView::default(),
            discover: DiscoverView::default(),
            trace: TraceView::default(),
            notice: None,
        }
    }

    /// True while any flow has a request outstanding.
    pub fn is_loading(&self) -> bool {
        self.explore.phase.is_loading()
            || self.discover.phase.is_loading()
            || self.trace.phase.is_loading()
    }

    pub fn phase(&self, tab: Tab) -> Phase {
        match tab {
            Tab::Explore => self.explore.phase,
            Tab::Discover => self.discover.phase,
            Tab::Trace => self.trace.phase,
        }
    }

    pub fn has_required_input(&self, tab: Tab) -> bool {
        match tab {
            Tab::Explore => !self.explore.input.trim().is_empty(),
            Tab::Discover => {
                !self.discover.selection.is_empty() || !self.discover.custom.trim().is_empty()
            }
            Tab::Trace => !self.trace.topic.trim().is_empty(),
        }
    }

    /// Whether the tab's trigger is enabled.
    pub fn can_submit(&self, tab: Tab) -> bool {
        !self.is_loading() && self.has_required_input(tab)
    }

    pub fn card_count(&self, tab: Tab) -> usize {
        match tab {
            Tab::Explore => self.explore.recommendation_count(),
            Tab::Discover => self.discover.playlist.len(),
            Tab::Trace => self.trace.timeline.len(),
        }
    }

    fn selected_mut(&mut self, tab: Tab) -> &mut Option<usize> {
        match tab {
            Tab::Explore => &mut self.explore.selected,
            Tab::Discover => &mut self.discover.selected,
            Tab::Trace => &mut self.trace.selected,
        }
    }

    pub fn apply(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::SelectTab(tab) => self.tab = tab,
            Action::NextTab => self.tab = self.tab.next(),
            Action::PreviousTab => self.tab = self.tab.previous(),
            Action::Input(ch) => self.input_char(ch),
            Action::Backspace => self.backspace(),
            Action::FocusUp if self.tab == Tab::Discover => {
                self.discover.focus = DiscoverFocus::Chips;
            }
            Action::FocusDown if self.tab == Tab::Discover => {
                self.discover.focus = DiscoverFocus::Custom;
            }
            Action::ChipLeft if self.chips_focused() => {
                self.discover.chip_cursor =
                    (self.discover.chip_cursor + CHIPS.len() - 1) % CHIPS.len();
            }
            Action::ChipRight if self.chips_focused() => {
                self.discover.chip_cursor = (self.discover.chip_cursor + 1) % CHIPS.len();
            }
            Action::SelectNext => self.move_selection(1),
            Action::SelectPrevious => self.move_selection(-1),
            Action::Submit => return self.submit(),
            Action::Completed(completion) => self.complete(completion),
            Action::Copy => return self.copy(),
            Action::CopyFinished(Ok(())) => {
                self.notice = Some(Notice::info("Copied!", COPY_SUCCEEDED));
            }
            Action::CopyFinished(Err(error)) => {
                warn!(%error, "clipboard write failed");
                self.notice = Some(Notice::error(COPY_FAILED));
            }
            Action::Tick => self.tick(),
            Action::FocusUp
            | Action::FocusDown
            | Action::ChipLeft
            | Action::ChipRight => {}
        }

        None
    }

    fn chips_focused(&self) -> bool {
        self.tab == Tab::Discover && self.discover.focus == DiscoverFocus::Chips
    }

    fn input_char(&mut self, ch: char) {
        match self.tab {
            Tab::Explore => self.explore.input.push(ch),
            Tab::Trace => self.trace.topic.push(ch),
            Tab::Discover => match self.discover.focus {
                DiscoverFocus::Custom => self.discover.custom.push(ch),
                DiscoverFocus::Chips if ch == ' ' => {
                    let cursor = self.discover.chip_cursor;
                    self.discover.toggle_chip(cursor);
                }
                DiscoverFocus::Chips => {
                    self.discover.focus = DiscoverFocus::Custom;
                    self.discover.custom.push(ch);
                }
            },
        }
    }

    fn backspace(&mut self) {
        match self.tab {
            Tab::Explore => {
                self.explore.input.pop();
            }
            Tab::Trace => {
                self.trace.topic.pop();
            }
            Tab::Discover if self.discover.focus == DiscoverFocus::Custom => {
                self.discover.custom.pop();
            }
            Tab::Discover => {}
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let tab = self.tab;
        let len = self.card_count(tab);
        let selected = self.selected_mut(tab);

        if len == 0 {
            *selected = None;
            return;
        }

        *selected = match (*selected, delta.signum()) {
            (None, 1) => Some(0),
            (None, _) => None,
            (Some(0), -1) => None,
            (Some(current), step) => {
                Some((current as i64 + step as i64).clamp(0, len as i64 - 1) as usize)
            }
        };
    }

    fn submit(&mut self) -> Option<Effect> {
        let tab = self.tab;
        if !self.can_submit(tab) {
            debug!(tab = tab.title(), loading = self.is_loading(), "submit ignored");
            return None;
        }

        let ticket = Uuid::new_v4();
        let request = match tab {
            Tab::Explore => {
                self.explore.phase = Phase::Loading { ticket };
                Request::Explore(ExploreRequest::from_input(&self.explore.input))
            }
            Tab::Discover => {
                self.discover.phase = Phase::Loading { ticket };
                Request::Discover(self.discover.request())
            }
            Tab::Trace => {
                self.trace.phase = Phase::Loading { ticket };
                Request::Trace(TraceRequest::from_input(&self.trace.topic))
            }
        };

        debug!(tab = tab.title(), %ticket, "dispatching request");
        Some(Effect::Dispatch { ticket, request })
    }

    fn complete(&mut self, completion: Completion) {
        let Completion { ticket, outcome } = completion;

        match outcome {
            Outcome::Explore(result) => {
                if !settle(&mut self.explore.phase, ticket, Tab::Explore) {
                    return;
                }
                match result {
                    Ok(result) => {
                        self.explore.current_talk = result.talk;
                        self.explore.summary = result.summary;
                        self.explore.insight = result.insight;
                        self.explore.recommendations = result.recommendations;
                        self.explore.selected = None;
                    }
                    Err(error) => self.fail(Tab::Explore, &error),
                }
            }
            Outcome::Discover(result) => {
                if !settle(&mut self.discover.phase, ticket, Tab::Discover) {
                    return;
                }
                match result {
                    Ok(playlist) => {
                        self.discover.playlist = playlist;
                        self.discover.selected = None;
                    }
                    Err(error) => self.fail(Tab::Discover, &error),
                }
            }
            Outcome::Trace(result) => {
                if !settle(&mut self.trace.phase, ticket, Tab::Trace) {
                    return;
                }
                match result {
                    Ok(timeline) => {
                        self.trace.timeline = timeline;
                        self.trace.selected = None;
                    }
                    Err(error) => self.fail(Tab::Trace, &error),
                }
            }
        }
    }

    fn fail(&mut self, tab: Tab, error: &ApiError) {
        warn!(tab = tab.title(), %error, "request failed");
        let message = match tab {
            Tab::Explore => EXPLORE_FAILED,
            Tab::Discover => DISCOVER_FAILED,
            Tab::Trace => TRACE_FAILED,
        };
        self.notice = Some(Notice::error(message));
    }

    /// Text the copy shortcut targets on the active tab.
    pub fn copy_target(&self) -> Option<String> {
        match self.tab {
            Tab::Explore => match self.explore.selected {
                Some(index) => self.explore.recommendation_at(index).map(|talk| talk.url.clone()),
                None if !self.explore.insight.is_empty() => Some(self.explore.insight.clone()),
                None => self.explore.current_talk.as_ref().map(|talk| talk.url.clone()),
            },
            Tab::Discover => self
                .discover
                .selected
                .and_then(|index| self.discover.playlist.get(index))
                .map(|entry| entry.talk.url.clone()),
            Tab::Trace => self
                .trace
                .selected
                .and_then(|index| self.trace.timeline.get(index))
                .map(|entry| entry.talk.url.clone()),
        }
    }

    fn copy(&mut self) -> Option<Effect> {
        match self.copy_target() {
            Some(text) => Some(Effect::Copy(text)),
            None => {
                self.notice = Some(Notice::info("Nothing to copy", "Select a card first."));
                None
            }
        }
    }

    fn tick(&mut self) {
        if let Some(notice) = &mut self.notice {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
            if notice.ticks_left == 0 {
                self.notice = None;
            }
        }
    }
}

/// Returns the flow to idle if `ticket` is the outstanding one. Completions
/// for any other ticket are stale and must not touch the view.
fn settle(phase: &mut Phase, ticket: Uuid, tab: Tab) -> bool {
    if phase.ticket() != Some(ticket) {
        debug!(tab = tab.title(), %ticket, "dropping stale completion");
        return false;
    }

    *phase = Phase::Idle;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize::PLACEHOLDER_THUMBNAIL, protocol::Endpoint};

    fn talk(title: &str, url: &str) -> TalkRef {
        TalkRef {
            title: title.into(),
            speaker: None,
            url: url.into(),
            thumbnail: PLACEHOLDER_THUMBNAIL.into(),
        }
    }

    fn type_text(state: &mut ViewState, text: &str) {
        for ch in text.chars() {
            assert!(state.apply(Action::Input(ch)).is_none());
        }
    }

    fn dispatch_ticket(effect: Option<Effect>) -> (Uuid, Request) {
        match effect {
            Some(Effect::Dispatch { ticket, request }) => (ticket, request),
            other => panic!("expected dispatch, got {:?}", other),
        }
    }

    fn rejected() -> ApiError {
        ApiError::Rejected {
            endpoint: Endpoint::Explore,
            message: "offline".into(),
        }
    }

    #[test]
    fn starts_on_trace_and_cycles_tabs() {
        let mut state = ViewState::default();
        assert_eq!(state.tab, Tab::Trace);

        state.apply(Action::NextTab);
        assert_eq!(state.tab, Tab::Explore);
        state.apply(Action::NextTab);
        assert_eq!(state.tab, Tab::Discover);
        state.apply(Action::NextTab);
        assert_eq!(state.tab, Tab::Trace);
        state.apply(Action::PreviousTab);
        assert_eq!(state.tab, Tab::Discover);
        state.apply(Action::SelectTab(Tab::Explore));
        assert_eq!(state.tab, Tab::Explore);
    }

    #[test]
    fn triggers_disabled_exactly_when_loading_or_input_missing() {
        let mut state = ViewState::default();
        for tab in Tab::ALL {
            assert!(!state.can_submit(tab), "{:?} has no input yet", tab);
        }

        state.trace.topic = "   ".into();
        assert!(!state.can_submit(Tab::Trace));

        state.trace.topic = "Oceans".into();
        state.explore.input = "https://ted.com/talks/x".into();
        state.discover.custom = "calm".into();
        for tab in Tab::ALL {
            assert!(state.can_submit(tab), "{:?} should be enabled", tab);
        }

        state.trace.phase = Phase::Loading {
            ticket: Uuid::new_v4(),
        };
        for tab in Tab::ALL {
            assert!(!state.can_submit(tab), "{:?} must be disabled while loading", tab);
        }

        state.trace.phase = Phase::Idle;
        state.discover.custom.clear();
        state.discover.toggle_chip(0);
        assert!(state.can_submit(Tab::Discover));
    }

    #[test]
    fn submit_without_input_is_a_no_op() {
        let mut state = ViewState::default();
        assert!(state.apply(Action::Submit).is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn submit_dispatches_once_until_completion() {
        let mut state = ViewState::default();
        type_text(&mut state, "Artificial Intelligence");

        let (ticket, request) = dispatch_ticket(state.apply(Action::Submit));
        assert_eq!(
            request,
            Request::Trace(TraceRequest::Topic("Artificial Intelligence".into()))
        );
        assert!(state.is_loading());
        assert!(state.apply(Action::Submit).is_none(), "second click is ignored");

        let timeline = vec![
            TimelineEntry {
                talk: talk("Machines That Think", "https://ted.com/talks/machines_that_think"),
                display_date: "June 15, 2015".into(),
                sort_key: 1_434_326_400,
            },
            TimelineEntry {
                talk: talk("The Rise of AI", "https://ted.com/talks/rise_of_ai"),
                display_date: "March 22, 2017".into(),
                sort_key: 1_490_140_800,
            },
        ];
        state.apply(Action::Completed(Completion {
            ticket,
            outcome: Outcome::Trace(Ok(timeline.clone())),
        }));

        assert!(!state.is_loading());
        assert_eq!(state.trace.timeline, timeline);
    }

    #[test]
    fn failed_explore_keeps_previous_talk_and_shows_one_notice() {
        let mut state = ViewState::new(Tab::Explore);
        let previous = talk("Earlier", "https://ted.com/talks/earlier");
        state.explore.current_talk = Some(previous.clone());
        state.explore.insight = "kept".into();
        type_text(&mut state, "https://ted.com/talks/next");

        let (ticket, _) = dispatch_ticket(state.apply(Action::Submit));
        state.apply(Action::Completed(Completion {
            ticket,
            outcome: Outcome::Explore(Err(rejected())),
        }));

        assert_eq!(state.explore.current_talk, Some(previous));
        assert_eq!(state.explore.insight, "kept");
        assert!(!state.is_loading());
        let notice = state.notice.as_ref().expect("error notice expected");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, EXPLORE_FAILED);
    }

    #[test]
    fn stale_completion_changes_nothing() {
        let mut state = ViewState::new(Tab::Explore);
        type_text(&mut state, "creativity");
        let (ticket, _) = dispatch_ticket(state.apply(Action::Submit));

        state.apply(Action::Completed(Completion {
            ticket: Uuid::new_v4(),
            outcome: Outcome::Explore(Err(rejected())),
        }));
        assert_eq!(state.explore.phase, Phase::Loading { ticket });
        assert!(state.notice.is_none());

        state.apply(Action::Completed(Completion {
            ticket,
            outcome: Outcome::Discover(Ok(Vec::new())),
        }));
        assert_eq!(state.explore.phase, Phase::Loading { ticket });
        assert!(state.discover.playlist.is_empty());
    }

    #[test]
    fn discover_request_follows_toggle_order() {
        let mut state = ViewState::new(Tab::Discover);
        state.apply(Action::ChipRight);
        state.apply(Action::ChipRight);
        state.apply(Action::Input(' ')); // Curious
        state.apply(Action::ChipLeft);
        state.apply(Action::ChipLeft);
        state.apply(Action::ChipLeft);
        state.apply(Action::Input(' ')); // Workout
        state.apply(Action::ChipRight);
        state.apply(Action::Input(' ')); // Inspired

        let request = state.discover.request();
        assert_eq!(request.mood, "Curious, Inspired");
        assert_eq!(request.activity, "Workout");
        assert_eq!(request.mood_activity, "Curious, Workout, Inspired");

        state.apply(Action::Input(' '));
        assert_eq!(state.discover.request().mood, "Curious");
    }

    #[test]
    fn typing_on_chip_row_moves_to_custom_field() {
        let mut state = ViewState::new(Tab::Discover);
        type_text(&mut state, "rainy");
        assert_eq!(state.discover.focus, DiscoverFocus::Custom);
        assert_eq!(state.discover.custom, "rainy");

        state.apply(Action::Backspace);
        assert_eq!(state.discover.custom, "rain");

        state.apply(Action::FocusUp);
        state.apply(Action::Backspace);
        assert_eq!(state.discover.custom, "rain");
    }

    #[test]
    fn copy_targets_selected_card_then_reports() {
        let mut state = ViewState::new(Tab::Discover);
        assert!(state.apply(Action::Copy).is_none());
        assert_eq!(
            state.notice.as_ref().map(|notice| notice.kind),
            Some(NoticeKind::Info)
        );

        state.discover.playlist = vec![PlaylistEntry {
            talk: talk("Stress", "https://ted.com/talks/stress"),
            tags: vec!["health".into()],
        }];
        state.apply(Action::SelectNext);
        assert_eq!(
            state.apply(Action::Copy),
            Some(Effect::Copy("https://ted.com/talks/stress".into()))
        );

        state.apply(Action::CopyFinished(Err(ClipboardError::Empty)));
        assert_eq!(
            state.notice.as_ref().map(|notice| notice.message.as_str()),
            Some(COPY_FAILED)
        );
    }

    #[test]
    fn explore_copy_prefers_selection_then_insight() {
        let mut state = ViewState::new(Tab::Explore);
        state.explore.insight = "Watch it.".into();
        state.explore.recommendations = vec![RecommendationGroup {
            category: "Growth".into(),
            talks: vec![
                talk("One", "https://ted.com/one"),
                talk("Two", "https://ted.com/two"),
            ],
        }];

        assert_eq!(state.copy_target().as_deref(), Some("Watch it."));
        state.apply(Action::SelectNext);
        state.apply(Action::SelectNext);
        state.apply(Action::SelectNext);
        assert_eq!(state.explore.selected, Some(1));
        assert_eq!(state.copy_target().as_deref(), Some("https://ted.com/two"));

        state.apply(Action::SelectPrevious);
        state.apply(Action::SelectPrevious);
        assert_eq!(state.explore.selected, None);
    }

    #[test]
    fn notice_expires_after_ticks() {
        let mut state = ViewState::default();
        state.notice = Some(Notice::error("boom"));

        for _ in 0..NOTICE_TICKS - 1 {
            state.apply(Action::Tick);
        }
        assert!(state.notice.is_some());
        state.apply(Action::Tick);
        assert!(state.notice.is_none());
    }
}
