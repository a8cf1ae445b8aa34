use yew::prelude::*;

#[function_component(LoadingScreen)]
pub fn loading_screen() -> Html {
    html! {
        <div class="loading-screen">{"FARMLOG…"}</div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfigErrorScreenProps {
    pub message: String,
}

/// Shown instead of the app when the bundle was built without Supabase settings
#[function_component(ConfigErrorScreen)]
pub fn config_error_screen(props: &ConfigErrorScreenProps) -> Html {
    html! {
        <div class="loading-screen config-error">
            <h1>{"FARMLOG"}</h1>
            <p>{props.message.clone()}</p>
            <small>{"Set FARMLOG_SUPABASE_URL and FARMLOG_SUPABASE_ANON_KEY, then rebuild."}</small>
        </div>
    }
}
