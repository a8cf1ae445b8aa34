use shared::{FormController, FormField, InputKind};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AnimalFormModalProps {
    pub form: FormController,
    pub busy: bool,
    pub on_field: Callback<(FormField, String)>,
    pub on_save: Callback<()>,
    pub on_close: Callback<()>,
}

fn field_input(field: FormField, value: &str, busy: bool, on_field: &Callback<(FormField, String)>) -> Html {
    let id = format!("field-{}", field.column());

    let input = match field.input_kind() {
        InputKind::TextArea => {
            let on_field = on_field.clone();
            let oninput = Callback::from(move |e: InputEvent| {
                let input: HtmlTextAreaElement = e.target_unchecked_into();
                on_field.emit((field, input.value()));
            });
            html! {
                <textarea id={id.clone()} class="input" value={value.to_string()} {oninput} disabled={busy} />
            }
        }
        kind => {
            let input_type = match kind {
                InputKind::Date => "date",
                InputKind::Number => "number",
                _ => "text",
            };
            let on_field = on_field.clone();
            let oninput = Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                on_field.emit((field, input.value()));
            });
            html! {
                <input
                    id={id.clone()}
                    type={input_type}
                    class="input"
                    value={value.to_string()}
                    {oninput}
                    disabled={busy}
                />
            }
        }
    };

    html! {
        <div class="form-group" key={field.column()}>
            <label class="label" for={id}>{field.label()}</label>
            {input}
        </div>
    }
}

#[function_component(AnimalFormModal)]
pub fn animal_form_modal(props: &AnimalFormModalProps) -> Html {
    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let on_save_click = {
        let on_save = props.on_save.clone();
        Callback::from(move |_: MouseEvent| on_save.emit(()))
    };

    if !props.form.is_open() {
        return html! {};
    }

    let fields = props.form.fields();

    html! {
        <div class="modal-backdrop" onclick={on_backdrop_click}>
            <div class="modal" onclick={on_modal_click}>
                <button type="button" class="modal-close" onclick={on_close_click}>{"✕"}</button>
                <h2 class="modal-title">{props.form.title()}</h2>

                <div class="modal-fields">
                    {for FormField::ALL.iter().map(|field| {
                        field_input(*field, fields.get(*field), props.busy, &props.on_field)
                    })}
                </div>

                <button
                    type="button"
                    class="btn btn-primary btn-block"
                    onclick={on_save_click}
                    disabled={props.busy}
                >
                    {if props.busy { "Menyimpan..." } else { "Simpan Data" }}
                </button>
            </div>
        </div>
    }
}
