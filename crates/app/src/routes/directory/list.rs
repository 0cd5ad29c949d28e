use crate::format_helpers::{error_message, format_date};
use dioxus::prelude::*;
use shared_types::{filter_by_query, Role, StaffListParams, StaffMember, STAFF_STATUSES};
use shared_ui::{
    options_from, toast_result, use_toast, Button, ButtonSize, ButtonVariant, Card, CardContent,
    DataTable, DataTableBody, DataTableCell, DataTableColumn, DataTableEmpty, DataTableHeader,
    DataTableRow, FormSelect, PageActions, PageHeader, PageTitle, SearchBar, SkeletonRows,
    StatusBadge, UserAvatar,
};

use super::form_sheet::{FormMode, StaffFormSheet};

/// People of one role tier. The slug comes from the URL (`employees`,
/// `managers`, ...); the layout has already checked the caller may see it.
#[component]
pub fn Directory(role: String) -> Element {
    match Role::from_slug(&role) {
        Some(role) => rsx! {
            DirectoryPage { key: "{role.slug()}", role }
        },
        None => rsx! {
            p { class: "page-error", "Unknown directory." }
        },
    }
}

#[component]
fn DirectoryPage(role: Role) -> Element {
    let mut query = use_signal(String::new);
    let mut status = use_signal(String::new);
    let mut sheet = use_signal(|| Option::<(FormMode, Option<StaffMember>)>::None);

    let mut data = use_resource(move || {
        let status = status.read().clone();
        async move {
            let params = StaffListParams {
                q: None,
                status: (!status.is_empty()).then_some(status),
            };
            server::api::list_staff(role, params).await
        }
    });

    let mut status_options = vec![(String::new(), "All statuses".to_string())];
    status_options.extend(options_from(STAFF_STATUSES));

    rsx! {
        PageHeader {
            PageTitle { subtitle: Some(format!("Everyone at the {} level you can manage", role.label())),
                "{role.plural_label()}"
            }
            PageActions {
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: move |_| sheet.set(Some((FormMode::Create, None))),
                    "Add {role.label()}"
                }
            }
        }

        SearchBar {
            value: query(),
            placeholder: "Search name, email, department...",
            on_search: move |q: String| query.set(q),
            FormSelect {
                value: status(),
                options: status_options,
                onchange: move |e: Event<FormData>| status.set(e.value()),
            }
        }

        match &*data.read() {
            Some(Ok(people)) => {
                let people = filter_by_query(people.clone(), &query.read());
                rsx! {
                    StaffTable {
                        people,
                        on_edit: move |m: StaffMember| sheet.set(Some((FormMode::Edit, Some(m)))),
                        on_changed: move |_| data.restart(),
                    }
                }
            }
            Some(Err(e)) => rsx! {
                Card {
                    CardContent {
                        p { class: "page-error", "{error_message(e)}" }
                    }
                }
            },
            None => rsx! {
                SkeletonRows { count: 5 }
            },
        }

        if let Some((mode, initial)) = sheet() {
            StaffFormSheet {
                mode,
                role,
                initial,
                on_close: move |_| sheet.set(None),
                on_saved: move |_| data.restart(),
            }
        }
    }
}

#[component]
fn StaffTable(
    people: Vec<StaffMember>,
    on_edit: EventHandler<StaffMember>,
    on_changed: EventHandler<()>,
) -> Element {
    rsx! {
        DataTable {
            DataTableHeader {
                DataTableColumn { "Name" }
                DataTableColumn { "Department" }
                DataTableColumn { "Position" }
                DataTableColumn { "Manager" }
                DataTableColumn { "Joined" }
                DataTableColumn { "Status" }
                DataTableColumn { "" }
            }
            DataTableBody {
                if people.is_empty() {
                    DataTableEmpty { colspan: 7, message: "No people match these filters." }
                }
                for member in people {
                    StaffRow {
                        key: "{member.id}",
                        member,
                        on_edit,
                        on_changed,
                    }
                }
            }
        }
    }
}

#[component]
fn StaffRow(
    member: StaffMember,
    on_edit: EventHandler<StaffMember>,
    on_changed: EventHandler<()>,
) -> Element {
    let toast = use_toast();
    let mut confirm_delete = use_signal(|| false);
    let mut busy = use_signal(|| false);
    let id = member.id;
    let active = member.is_active();
    let edit_target = member.clone();

    let toggle = move |_: MouseEvent| {
        spawn(async move {
            busy.set(true);
            let result = server::api::toggle_staff_status(id).await;
            busy.set(false);
            let msg = match &result {
                Ok(m) if m.is_active() => format!("{} reactivated", m.name),
                Ok(m) => format!("{} deactivated", m.name),
                Err(_) => String::new(),
            };
            if toast_result(toast, &result.map_err(|e| error_message(&e)), &msg) {
                on_changed.call(());
            }
        });
    };

    let delete = move |_: MouseEvent| {
        if !confirm_delete() {
            confirm_delete.set(true);
            return;
        }
        spawn(async move {
            busy.set(true);
            let result = server::api::delete_staff(id).await;
            busy.set(false);
            confirm_delete.set(false);
            if toast_result(toast, &result.map_err(|e| error_message(&e)), "Person removed") {
                on_changed.call(());
            }
        });
    };

    rsx! {
        DataTableRow { muted: !active,
            DataTableCell {
                div { class: "person-cell",
                    UserAvatar { name: member.name.clone() }
                    div { class: "person-cell-text",
                        span { class: "person-cell-name", "{member.name}" }
                        span { class: "person-cell-sub", "{member.email}" }
                    }
                }
            }
            DataTableCell { "{member.department}" }
            DataTableCell { "{member.position}" }
            DataTableCell { {member.manager_name.clone().unwrap_or_else(|| "\u{2014}".to_string())} }
            DataTableCell { "{format_date(member.joined_on)}" }
            DataTableCell {
                StatusBadge { status: member.status.clone() }
            }
            DataTableCell {
                div { class: "row-actions",
                    Button {
                        variant: ButtonVariant::Ghost,
                        size: ButtonSize::Small,
                        onclick: move |_| on_edit.call(edit_target.clone()),
                        "Edit"
                    }
                    Button {
                        variant: ButtonVariant::Outline,
                        size: ButtonSize::Small,
                        disabled: busy(),
                        onclick: toggle,
                        if active { "Deactivate" } else { "Activate" }
                    }
                    Button {
                        variant: ButtonVariant::Destructive,
                        size: ButtonSize::Small,
                        disabled: busy(),
                        onclick: delete,
                        if confirm_delete() { "Confirm delete" } else { "Delete" }
                    }
                }
            }
        }
    }
}
