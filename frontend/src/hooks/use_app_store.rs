use std::ops::Deref;
use std::rc::Rc;

use shared::{AppAction, AppState};
use yew::prelude::*;

/// [`AppState`] behind Yew's reducer
#[derive(Default, PartialEq)]
pub struct AppStore(AppState);

impl Reducible for AppStore {
    type Action = AppAction;

    fn reduce(self: Rc<Self>, action: AppAction) -> Rc<Self> {
        Rc::new(AppStore(self.0.reduce(action)))
    }
}

impl Deref for AppStore {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.0
    }
}

pub type AppStoreHandle = UseReducerHandle<AppStore>;

/// Application state owned by the root component
#[hook]
pub fn use_app_store() -> AppStoreHandle {
    use_reducer(AppStore::default)
}
