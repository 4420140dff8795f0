// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring the records views, the form dialog,
//! and the store commands.

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::forms;
use crate::logic::store::{Collection, Record, RecordStore};
use crate::models::Values;
use crate::ui::components::form_dialog::{
    self, CloseReason, FormDialogCommand, FormDialogEvent, FormDialogModel, FormDialogMsg,
};

/// Which record the open dialog edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialogTarget {
    pub collection: Collection,
    /// `None` when creating.
    pub id: Option<Uuid>,
}

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Collection shown in the records view.
    pub active: Collection,
    /// Last loaded records per collection.
    pub records: BTreeMap<Collection, Vec<Record>>,
    /// Slide-in dialog state.
    pub dialog: FormDialogModel,
    /// Record the dialog is bound to while open.
    pub dialog_target: Option<DialogTarget>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn records(&self, collection: Collection) -> &[Record] {
        self.records
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Application messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    SelectCollection(Collection),
    OpenCreate(Collection),
    OpenEdit { collection: Collection, id: Uuid },
    RefreshRequested,
    RecordsLoaded {
        collection: Collection,
        result: Result<Vec<Record>, String>,
    },
    RecordSaved {
        target: DialogTarget,
        result: Result<Uuid, String>,
    },
    DismissError,
    Dialog(FormDialogMsg),
}

/// Commands represent side-effects executed between frames.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    LoadRecords(Collection),
    SaveRecord { target: DialogTarget, values: Values },
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::SelectCollection(collection) => {
            model.active = collection;
            cmds.push(Command::LoadRecords(collection));
        }
        Msg::RefreshRequested => cmds.push(Command::LoadRecords(model.active)),
        Msg::DismissError => model.error = None,
        Msg::OpenCreate(collection) => open_dialog(
            model,
            DialogTarget {
                collection,
                id: None,
            },
            Values::new(),
            cmds,
        ),
        Msg::OpenEdit { collection, id } => {
            let found = model
                .records(collection)
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.values.clone());
            match found {
                Some(values) => open_dialog(
                    model,
                    DialogTarget {
                        collection,
                        id: Some(id),
                    },
                    values,
                    cmds,
                ),
                None => surface_event(
                    model,
                    format!("Record {id} is no longer available."),
                    true,
                ),
            }
        }
        Msg::RecordsLoaded { collection, result } => match result {
            Ok(records) => {
                model.records.insert(collection, records);
            }
            Err(err) => surface_event(model, format!("Failed to load records:\n\n{err}"), true),
        },
        Msg::RecordSaved { target, result } => {
            if model.dialog_target != Some(target) {
                tracing::warn!(?target, "save result for a dialog that is no longer open");
                return;
            }
            let saved = result.is_ok();
            dialog_update(model, FormDialogMsg::SaveCompleted(result.map(|_| ())), cmds);
            if saved {
                cmds.push(Command::LoadRecords(target.collection));
            }
        }
        Msg::Dialog(m) => dialog_update(model, m, cmds),
    }
}

/// Execute a command against the store and return the resulting message.
pub fn run_command(cmd: Command, store: &dyn RecordStore) -> Msg {
    match cmd {
        Command::LoadRecords(collection) => Msg::RecordsLoaded {
            collection,
            result: store.list(collection).map_err(|e| e.to_string()),
        },
        Command::SaveRecord { target, values } => Msg::RecordSaved {
            target,
            result: store
                .save(target.collection, target.id, &values)
                .map_err(|e| e.to_string()),
        },
    }
}

fn open_dialog(
    model: &mut AppModel,
    target: DialogTarget,
    initial_values: Values,
    cmds: &mut Vec<Command>,
) {
    if model.dialog.is_submitting() {
        surface_event(
            model,
            "Please wait until the current save finishes.".to_string(),
            false,
        );
        return;
    }
    match forms::schema_for(target.collection, target.id.is_some()) {
        Ok(schema) => {
            model.dialog_target = Some(target);
            dialog_update(
                model,
                FormDialogMsg::Open {
                    schema: Arc::new(schema),
                    initial_values,
                },
                cmds,
            );
        }
        Err(err) => surface_event(model, format!("Cannot open form:\n\n{err:#}"), true),
    }
}

fn dialog_update(model: &mut AppModel, msg: FormDialogMsg, cmds: &mut Vec<Command>) {
    let mut dialog_cmds = Vec::new();
    let event = form_dialog::update(&mut model.dialog, msg, &mut dialog_cmds);

    for c in dialog_cmds {
        match c {
            FormDialogCommand::Save(values) => match model.dialog_target {
                Some(target) => cmds.push(Command::SaveRecord { target, values }),
                None => tracing::error!("dialog submitted without a target record"),
            },
        }
    }

    match event {
        Some(FormDialogEvent::Closed(reason)) => {
            let collection = model.dialog_target.take().map(|t| t.collection);
            let message = match (reason, collection) {
                (CloseReason::Saved, Some(c)) => format!("Saved to {}.", c.title()),
                (CloseReason::Saved, None) => "Saved.".to_string(),
                (CloseReason::Cancelled | CloseReason::Dismissed, _) => {
                    "Changes discarded.".to_string()
                }
            };
            surface_event(model, message, false);
        }
        // The dialog shows its own banner; the status bar keeps a trace.
        Some(FormDialogEvent::SaveFailed(err)) => {
            surface_event(model, format!("Save failed: {err}"), false)
        }
        None => {}
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::store::MemoryStore;
    use crate::models::FieldValue;

    fn dispatch(model: &mut AppModel, msg: Msg, store: &MemoryStore) {
        let mut queue = vec![msg];
        while let Some(msg) = queue.pop() {
            let mut cmds = Vec::new();
            update(model, msg, &mut cmds);
            queue.extend(cmds.into_iter().map(|c| run_command(c, store)));
        }
    }

    fn change(model: &mut AppModel, name: &str, value: FieldValue, store: &MemoryStore) {
        dispatch(
            model,
            Msg::Dialog(FormDialogMsg::FieldChanged {
                name: name.into(),
                value,
            }),
            store,
        );
    }

    fn fill_valid_user(model: &mut AppModel, email: &str, store: &MemoryStore) {
        change(model, "full_name", FieldValue::text("Ada Lovelace"), store);
        change(model, "email", FieldValue::text(email), store);
        change(model, "role", FieldValue::text("admin"), store);
        change(model, "country", FieldValue::text("GB"), store);
    }

    #[test]
    fn create_user_round_trip() {
        let store = MemoryStore::new();
        let mut model = AppModel::default();

        dispatch(&mut model, Msg::OpenCreate(Collection::Users), &store);
        assert!(model.dialog.is_open());

        fill_valid_user(&mut model, "ada@example.com", &store);
        dispatch(&mut model, Msg::Dialog(FormDialogMsg::SubmitRequested), &store);

        assert!(!model.dialog.is_open());
        assert!(model.dialog_target.is_none());
        let users = model.records(Collection::Users);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].values["username"], FieldValue::text("ada.lovelace"));
        assert!(!users[0].values.contains_key("extension"));
        assert_eq!(model.status.as_deref(), Some("Saved to Users."));
    }

    #[test]
    fn invalid_submit_never_reaches_store() {
        let store = MemoryStore::new();
        let mut model = AppModel::default();

        dispatch(&mut model, Msg::OpenCreate(Collection::Users), &store);
        dispatch(&mut model, Msg::Dialog(FormDialogMsg::SubmitRequested), &store);

        assert!(model.dialog.is_open());
        assert!(store.list(Collection::Users).unwrap().is_empty());
    }

    #[test]
    fn rejected_save_keeps_dialog_open_with_input() {
        let store = MemoryStore::new();
        let mut model = AppModel::default();

        dispatch(&mut model, Msg::OpenCreate(Collection::Users), &store);
        fill_valid_user(&mut model, "ada@example.com", &store);
        dispatch(&mut model, Msg::Dialog(FormDialogMsg::SubmitRequested), &store);

        dispatch(&mut model, Msg::OpenCreate(Collection::Users), &store);
        fill_valid_user(&mut model, "ADA@example.com", &store);
        dispatch(&mut model, Msg::Dialog(FormDialogMsg::SubmitRequested), &store);

        let session = model.dialog.session().unwrap();
        assert!(!session.is_submitting());
        assert!(session.submit_error().unwrap().contains("already exists"));
        assert_eq!(
            session.state().value("email"),
            Some(&FieldValue::text("ADA@example.com"))
        );
        assert!(model.status.as_deref().unwrap().starts_with("Save failed"));
        assert!(model.error.is_none());
    }

    #[test]
    fn edit_prefills_and_updates_record() {
        let store = MemoryStore::new();
        let mut model = AppModel::default();

        dispatch(&mut model, Msg::OpenCreate(Collection::Users), &store);
        fill_valid_user(&mut model, "ada@example.com", &store);
        dispatch(&mut model, Msg::Dialog(FormDialogMsg::SubmitRequested), &store);
        let id = model.records(Collection::Users)[0].id;

        dispatch(
            &mut model,
            Msg::OpenEdit {
                collection: Collection::Users,
                id,
            },
            &store,
        );
        let session = model.dialog.session().unwrap();
        assert_eq!(session.schema().config.title, "Edit user");
        assert_eq!(
            session.state().value("email"),
            Some(&FieldValue::text("ada@example.com"))
        );

        change(&mut model, "email", FieldValue::text("countess@example.com"), &store);
        dispatch(&mut model, Msg::Dialog(FormDialogMsg::SubmitRequested), &store);

        let users = model.records(Collection::Users);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].values["email"], FieldValue::text("countess@example.com"));
    }

    #[test]
    fn cancel_discards_and_reports() {
        let store = MemoryStore::new();
        let mut model = AppModel::default();

        dispatch(&mut model, Msg::OpenCreate(Collection::Escalations), &store);
        dispatch(&mut model, Msg::Dialog(FormDialogMsg::CancelRequested), &store);

        assert!(!model.dialog.is_open());
        assert_eq!(model.status.as_deref(), Some("Changes discarded."));
    }

    #[test]
    fn edit_of_unknown_record_sets_error() {
        let store = MemoryStore::new();
        let mut model = AppModel::default();

        dispatch(
            &mut model,
            Msg::OpenEdit {
                collection: Collection::Users,
                id: Uuid::new_v4(),
            },
            &store,
        );
        assert!(!model.dialog.is_open());
        assert!(model.error.is_some());
    }

    #[test]
    fn select_collection_enqueues_load() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::SelectCollection(Collection::Escalations),
            &mut cmds,
        );
        assert_eq!(model.active, Collection::Escalations);
        assert_eq!(cmds, vec![Command::LoadRecords(Collection::Escalations)]);
    }

    #[test]
    fn stale_save_result_is_ignored() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::RecordSaved {
                target: DialogTarget {
                    collection: Collection::Users,
                    id: None,
                },
                result: Ok(Uuid::new_v4()),
            },
            &mut cmds,
        );
        assert!(cmds.is_empty());
        assert!(model.status.is_none());
    }
}
