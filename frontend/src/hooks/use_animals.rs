use std::rc::Rc;

use shared::{AnimalRecord, AppAction, FormField, RecordId};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::use_app_store::AppStoreHandle;
use crate::services::logging::Logger;
use crate::services::Services;

#[derive(Clone, PartialEq)]
pub struct UseAnimalsActions {
    pub refresh: Callback<()>,
    pub open_create: Callback<()>,
    pub open_edit: Callback<AnimalRecord>,
    pub close_form: Callback<()>,
    pub set_field: Callback<(FormField, String)>,
    pub save: Callback<()>,
    pub delete: Callback<RecordId>,
}

#[hook]
pub fn use_animals(store: &AppStoreHandle, services: &Rc<Services>) -> UseAnimalsActions {
    // Reload the whole collection
    let refresh = {
        let dispatcher = store.dispatcher();
        let services = services.clone();

        use_callback((), move |_: (), _| {
            let dispatcher = dispatcher.clone();
            let services = services.clone();

            spawn_local(async move {
                let records = services.gateway.fetch_all().await;
                dispatcher.dispatch(AppAction::RecordsLoaded(records));
            });
        })
    };

    let open_create = {
        let dispatcher = store.dispatcher();
        use_callback((), move |_: (), _| dispatcher.dispatch(AppAction::OpenCreate))
    };

    let open_edit = {
        let dispatcher = store.dispatcher();
        use_callback((), move |record: AnimalRecord, _| dispatcher.dispatch(AppAction::OpenEdit(record)))
    };

    let close_form = {
        let dispatcher = store.dispatcher();
        use_callback((), move |_: (), _| dispatcher.dispatch(AppAction::CloseForm))
    };

    let set_field = {
        let dispatcher = store.dispatcher();
        use_callback((), move |(field, value): (FormField, String), _| {
            dispatcher.dispatch(AppAction::SetField(field, value))
        })
    };

    // Reads the form of the current render, so it is rebuilt every render
    let save = {
        let store = store.clone();
        let services = services.clone();

        Callback::from(move |_: ()| {
            if store.busy {
                return;
            }

            let form = store.form.clone();
            let dispatcher = store.dispatcher();
            let services = services.clone();
            dispatcher.dispatch(AppAction::WriteStarted);

            spawn_local(async move {
                match services.gateway.save(&form).await {
                    Ok(outcome) => {
                        Logger::info_with_component(
                            "use-animals",
                            &format!("{} succeeded, {} records", outcome.operation.label(), outcome.records.len()),
                        );
                        dispatcher.dispatch(AppAction::WriteSucceeded(outcome.records));
                    }
                    Err(e) => {
                        Logger::error_with_component("use-animals", &format!("Save failed: {}", e));
                        dispatcher.dispatch(AppAction::WriteFailed);
                        gloo::dialogs::alert(&e.to_string());
                    }
                }
            });
        })
    };

    let delete = {
        let dispatcher = store.dispatcher();
        let services = services.clone();

        use_callback((), move |id: RecordId, _| {
            let dispatcher = dispatcher.clone();
            let services = services.clone();

            spawn_local(async move {
                match services.gateway.delete(&id, gloo::dialogs::confirm).await {
                    Ok(Some(outcome)) => dispatcher.dispatch(AppAction::RecordsLoaded(outcome.records)),
                    Ok(None) => Logger::debug_with_component("use-animals", "Delete cancelled"),
                    Err(e) => gloo::dialogs::alert(&e.to_string()),
                }
            });
        })
    };

    UseAnimalsActions {
        refresh,
        open_create,
        open_edit,
        close_form,
        set_field,
        save,
        delete,
    }
}
