use std::rc::Rc;

use shared::date_utils::today;
use shared::SessionPhase;
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::animal_card::AnimalCard;
use components::animal_form_modal::AnimalFormModal;
use components::header::Header;
use components::loading_screen::{ConfigErrorScreen, LoadingScreen};
use components::login_form::LoginForm;
use hooks::use_animals::use_animals;
use hooks::use_app_store::use_app_store;
use hooks::use_session::use_session;
use services::config::AppConfig;
use services::{logging, Services};

#[derive(Properties, PartialEq)]
struct AppProps {
    config: Result<AppConfig, String>,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    match &props.config {
        Ok(config) => html! { <FarmLog config={config.clone()} /> },
        Err(message) => html! { <ConfigErrorScreen message={message.clone()} /> },
    }
}

#[derive(Properties, PartialEq)]
struct FarmLogProps {
    config: AppConfig,
}

#[function_component(FarmLog)]
fn farm_log(props: &FarmLogProps) -> Html {
    let services: Rc<Services> = use_memo(props.config.supabase.clone(), |supabase| Services::new(supabase.clone()));

    let store = use_app_store();
    let animals = use_animals(&store, &services);
    let session = use_session(&store, &services, animals.refresh.clone());

    match &store.phase {
        SessionPhase::Loading => html! { <LoadingScreen /> },
        SessionPhase::Unauthenticated => html! {
            <LoginForm error={store.auth_error.clone()} on_login={session.login.clone()} />
        },
        SessionPhase::Authenticated(current) => {
            let today = today();
            let on_fab_click = {
                let open_create = animals.open_create.clone();
                Callback::from(move |_: MouseEvent| open_create.emit(()))
            };

            html! {
                <div class="app">
                    <Header
                        user_email={current.user.email.clone()}
                        on_add={animals.open_create.clone()}
                        on_logout={session.logout.clone()}
                    />

                    <main class="animal-list">
                        {if store.records.is_empty() {
                            html! { <p class="empty-state">{"Belum ada data kambing"}</p> }
                        } else {
                            html! {
                                {for store.records.iter().map(|record| html! {
                                    <AnimalCard
                                        key={record.id.to_string()}
                                        record={record.clone()}
                                        {today}
                                        on_edit={animals.open_edit.clone()}
                                        on_delete={animals.delete.clone()}
                                    />
                                })}
                            }
                        }}
                    </main>

                    <button type="button" class="fab" onclick={on_fab_click}>{"+"}</button>

                    <AnimalFormModal
                        form={store.form.clone()}
                        busy={store.busy}
                        on_field={animals.set_field.clone()}
                        on_save={animals.save.clone()}
                        on_close={animals.close_form.clone()}
                    />
                </div>
            }
        }
    }
}

fn main() {
    let config = AppConfig::from_env().map_err(|e| format!("{:#}", e));

    let level = config
        .as_ref()
        .map(|config| config.log_level)
        .unwrap_or(log::LevelFilter::Info);
    if let Err(e) = logging::init(level) {
        gloo::console::error!(format!("Failed to initialize logging: {}", e));
    }

    match &config {
        Ok(config) => log::info!("Starting FarmLog against table {}", config.supabase.table),
        Err(message) => log::error!("{}", message),
    }

    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
