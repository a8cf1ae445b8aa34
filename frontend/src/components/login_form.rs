use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    /// Provider message from the last failed attempt, shown verbatim
    pub error: Option<String>,
    pub on_login: Callback<(String, String)>,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);

    let on_email_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password_input = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_login.emit(((*email).clone(), (*password).clone()));
        })
    };

    html! {
        <div class="login-screen">
            <form class="login-card" onsubmit={on_submit}>
                <div class="login-title">
                    <h1><span>{"FARM"}</span><span class="accent">{"LOG"}</span></h1>
                    <p>{"login dulu atuh"}</p>
                </div>

                <input
                    class="input"
                    type="email"
                    placeholder="Email"
                    value={(*email).clone()}
                    oninput={on_email_input}
                />
                <input
                    class="input"
                    type="password"
                    placeholder="Password"
                    value={(*password).clone()}
                    oninput={on_password_input}
                />

                {if let Some(error) = &props.error {
                    html! { <p class="login-error">{error.clone()}</p> }
                } else {
                    html! {}
                }}

                <button type="submit" class="btn btn-primary btn-block">{"Masuk"}</button>
            </form>
        </div>
    }
}
