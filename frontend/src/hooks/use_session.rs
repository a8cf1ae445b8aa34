use std::rc::Rc;

use shared::{AppAction, Session};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::use_app_store::AppStoreHandle;
use crate::services::logging::Logger;
use crate::services::Services;

#[derive(Clone, PartialEq)]
pub struct UseSessionActions {
    pub login: Callback<(String, String)>,
    pub logout: Callback<()>,
}

/// Restores the session on mount and follows session changes.
///
/// `refresh` runs whenever a session becomes active.
#[hook]
pub fn use_session(store: &AppStoreHandle, services: &Rc<Services>, refresh: Callback<()>) -> UseSessionActions {
    use_effect_with((), {
        let dispatcher = store.dispatcher();
        let services = services.clone();

        move |_| {
            let subscription = services.session.on_change(Box::new({
                let dispatcher = dispatcher.clone();
                let refresh = refresh.clone();
                move |session: Option<Session>| {
                    let signed_in = session.is_some();
                    dispatcher.dispatch(AppAction::SessionChanged(session));
                    if signed_in {
                        refresh.emit(());
                    }
                }
            }));

            spawn_local(async move {
                let session = services.session.restore().await;
                let signed_in = session.is_some();
                dispatcher.dispatch(AppAction::SessionChanged(session));
                if signed_in {
                    refresh.emit(());
                }
            });

            move || subscription.unsubscribe()
        }
    });

    let login = {
        let dispatcher = store.dispatcher();
        let services = services.clone();

        use_callback((), move |(email, password): (String, String), _| {
            let dispatcher = dispatcher.clone();
            let services = services.clone();
            dispatcher.dispatch(AppAction::ClearAuthError);

            spawn_local(async move {
                // On success the change listener moves the app to the dashboard
                if let Err(e) = services.session.login(&email, &password).await {
                    dispatcher.dispatch(AppAction::AuthFailed(e.to_string()));
                }
            });
        })
    };

    let logout = {
        let services = services.clone();

        use_callback((), move |_: (), _| {
            let services = services.clone();

            spawn_local(async move {
                if let Err(e) = services.session.logout().await {
                    Logger::warn_with_component("use-session", &format!("Sign out request failed: {}", e));
                }
            });
        })
    };

    UseSessionActions { login, logout }
}
