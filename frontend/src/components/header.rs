use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub user_email: Option<String>,
    pub on_add: Callback<()>,
    pub on_logout: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let on_add = {
        let on_add = props.on_add.clone();
        Callback::from(move |_: MouseEvent| on_add.emit(()))
    };

    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };

    html! {
        <header class="header">
            <div class="header-brand">
                <h1><span>{"FARM"}</span><span class="accent">{"LOG"}</span></h1>
                <p class="tagline">{"livestock management"}</p>
            </div>
            <div class="header-actions">
                {if let Some(email) = &props.user_email {
                    html! { <span class="header-user">{email.clone()}</span> }
                } else {
                    html! {}
                }}
                <button type="button" class="btn btn-link" onclick={on_add}>{"Add"}</button>
                <button type="button" class="btn btn-link btn-danger" onclick={on_logout}>{"Logout"}</button>
            </div>
        </header>
    }
}
