use chrono::NaiveDate;
use shared::date_utils::{format_date, get_age};
use shared::{format_price, AnimalRecord, RecordId};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AnimalCardProps {
    pub record: AnimalRecord,
    pub today: NaiveDate,
    pub on_edit: Callback<AnimalRecord>,
    pub on_delete: Callback<RecordId>,
}

fn price_suffix(price: Option<i64>) -> String {
    price.map(|p| format!(" · {}", format_price(p))).unwrap_or_default()
}

#[function_component(AnimalCard)]
pub fn animal_card(props: &AnimalCardProps) -> Html {
    let record = &props.record;

    let on_edit = {
        let on_edit = props.on_edit.clone();
        let record = record.clone();
        Callback::from(move |_: MouseEvent| on_edit.emit(record.clone()))
    };

    let on_delete = {
        let on_delete = props.on_delete.clone();
        let id = record.id.clone();
        Callback::from(move |_: MouseEvent| on_delete.emit(id.clone()))
    };

    let illness_dates = [
        ("Sakit", record.illness_date),
        ("Diobati", record.treatment_date),
        ("Sembuh", record.recovery_date),
    ]
    .into_iter()
    .filter_map(|(label, date)| date.map(|d| format!("{} {}", label, format_date(Some(d)))))
    .collect::<Vec<_>>();

    html! {
        <div class="animal-card">
            <h2>{record.name.clone()}</h2>

            <p>{format!("📅 Lahir: {} ({})", format_date(record.birth_date), get_age(record.birth_date, props.today))}</p>

            {if record.marriage_date.is_some() {
                html! {
                    <p>{format!("🤰 Kawin: {} → {}", format_date(record.marriage_date), format_date(record.estimated_birth_date))}</p>
                }
            } else { html! {} }}

            {if record.purchase_date.is_some() {
                html! {
                    <p>{format!("💰 Beli: {}{}", format_date(record.purchase_date), price_suffix(record.purchase_price))}</p>
                }
            } else { html! {} }}

            {if record.is_sold() {
                html! {
                    <p class="sold">{format!("🧾 Jual: {}{}", format_date(record.sale_date), price_suffix(record.sale_price))}</p>
                }
            } else { html! {} }}

            {if let Some(history) = &record.illness_history {
                html! {
                    <p class="illness">
                        {format!("🤒 {}", history)}
                        {if illness_dates.is_empty() {
                            html! {}
                        } else {
                            html! { <small>{format!(" ({})", illness_dates.join(", "))}</small> }
                        }}
                    </p>
                }
            } else { html! {} }}

            {if record.is_deceased() {
                html! {
                    <p class="deceased">
                        {format!("💀 Meninggal: {}", format_date(record.death_date))}
                        {record.death_note.as_ref().map(|note| format!(" · {}", note)).unwrap_or_default()}
                    </p>
                }
            } else { html! {} }}

            <div class="card-actions">
                <button type="button" class="btn btn-edit" onclick={on_edit}>{"✏️ Edit"}</button>
                <button type="button" class="btn btn-delete" onclick={on_delete}>{"🗑️ Hapus"}</button>
            </div>
        </div>
    }
}
