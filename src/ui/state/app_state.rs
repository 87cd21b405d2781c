use std::collections::BTreeSet;
use std::path::PathBuf;

use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::record::WorkplaceId;
use crate::domain::filter::FilterState;
use crate::usecase::services::compare_service::ChangeReport;

pub struct AppState {
    pub before_path: Signal<Option<PathBuf>>,
    pub after_path: Signal<Option<PathBuf>>,
    pub report: Signal<Option<ChangeReport>>,
    pub filters: Signal<FilterState>,
    pub checked_keys: Signal<BTreeSet<WorkplaceId>>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            before_path: use_signal(|| None::<PathBuf>),
            after_path: use_signal(|| None::<PathBuf>),
            report: use_signal(|| None::<ChangeReport>),
            filters: use_signal(FilterState::default),
            checked_keys: use_signal(BTreeSet::<WorkplaceId>::new),
            busy: use_signal(|| false),
            status: use_signal(|| "Готово".to_string()),
        }
    }
}
