pub mod cards;

use crate::{
    protocol::Flavor,
    state::{CHIPS, DiscoverFocus, Notice, Tab, ViewState},
};

use cards::CardViewModel;

#[derive(Debug, Clone)]
pub struct AppViewModel {
    pub tab: Tab,
    pub api_base: String,
    pub flavor: Flavor,
    pub form: FormViewModel,
    pub body: BodyViewModel,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone)]
pub struct FormViewModel {
    pub chips: Vec<ChipViewModel>,
    pub field: FieldViewModel,
    pub trigger: TriggerViewModel,
}

#[derive(Debug, Clone)]
pub struct FieldViewModel {
    pub value: String,
    pub placeholder: &'static str,
    pub focused: bool,
}

#[derive(Debug, Clone)]
pub struct ChipViewModel {
    pub label: &'static str,
    pub selected: bool,
    pub under_cursor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerViewModel {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub enum BodyViewModel {
    Explore {
        talk: Option<CardViewModel>,
        why_watch: CardViewModel,
        recommendations: CardViewModel,
    },
    Playlist(Vec<CardViewModel>),
    Timeline(Vec<CardViewModel>),
}

pub fn trigger_label(tab: Tab, loading: bool) -> &'static str {
    match (tab, loading) {
        (Tab::Explore, false) => "Generate",
        (Tab::Explore, true) => "Generating...",
        (Tab::Discover, false) => "Generate playlist",
        (Tab::Discover, true) => "Generating playlist...",
        (Tab::Trace, false) => "Build timeline",
        (Tab::Trace, true) => "Building timeline...",
    }
}

pub fn build_view_model(state: &ViewState, api_base: &str, flavor: Flavor) -> AppViewModel {
    let tab = state.tab;
    let trigger = TriggerViewModel {
        label: trigger_label(tab, state.phase(tab).is_loading()),
        enabled: state.can_submit(tab),
    };

    let (form, body) = match tab {
        Tab::Explore => (
            FormViewModel {
                chips: Vec::new(),
                field: FieldViewModel {
                    value: state.explore.input.clone(),
                    placeholder: "Paste or search a TED Talk URL…",
                    focused: true,
                },
                trigger,
            },
            BodyViewModel::Explore {
                talk: cards::featured_talk_card(&state.explore),
                why_watch: cards::why_watch_card(&state.explore),
                recommendations: cards::recommendations_card(&state.explore),
            },
        ),
        Tab::Discover => {
            let chips_focused = state.discover.focus == DiscoverFocus::Chips;
            let chips = CHIPS
                .iter()
                .enumerate()
                .map(|(index, chip)| ChipViewModel {
                    label: chip.label,
                    selected: state.discover.is_chip_selected(index),
                    under_cursor: chips_focused && state.discover.chip_cursor == index,
                })
                .collect();

            (
                FormViewModel {
                    chips,
                    field: FieldViewModel {
                        value: state.discover.custom.clone(),
                        placeholder: "…or type your own",
                        focused: !chips_focused,
                    },
                    trigger,
                },
                BodyViewModel::Playlist(cards::playlist_cards(&state.discover)),
            )
        }
        Tab::Trace => (
            FormViewModel {
                chips: Vec::new(),
                field: FieldViewModel {
                    value: state.trace.topic.clone(),
                    placeholder: "Enter a topic e.g. Artificial Intelligence",
                    focused: true,
                },
                trigger,
            },
            BodyViewModel::Timeline(cards::timeline_cards(&state.trace)),
        ),
    };

    AppViewModel {
        tab,
        api_base: api_base.to_string(),
        flavor,
        form,
        body,
        notice: state.notice.clone(),
    }
}
