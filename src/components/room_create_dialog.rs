//! Room creation modal and its host/guest pre-check dialogs.
//!
//! SYSTEM CONTEXT
//! ==============
//! The rooms page owns the `RoomCreateFlow` signal and opens the dialog after
//! the room-status lookup. This component renders whichever step is active
//! and submits the form through the session store.

use leptos::prelude::*;

use crate::app::StoreHandle;
use crate::net::types::GameVersion;
use crate::state::room_create::{CreateDialog, RoomCreateFlow};
use crate::util::validation::CreateRoomForm;

#[component]
pub fn RoomCreateDialog(flow: RwSignal<RoomCreateFlow>, versions: RwSignal<Vec<GameVersion>>) -> impl IntoView {
    let store = expect_context::<StoreHandle>();

    let dialog = move || flow.get().dialog;
    let current_room_name = move || flow.get().current_room.map(|r| r.name).unwrap_or_default();

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            flow.update(RoomCreateFlow::handle_escape);
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let current = flow.get_untracked();
        if current.submitting {
            return;
        }
        if let Err(message) = current.form.to_request() {
            flow.update(|f| f.form_error = Some(message));
            return;
        }
        flow.update(|f| {
            f.submitting = true;
            f.form_error = None;
        });

        #[cfg(feature = "hydrate")]
        {
            let Some(store) = store.get_value() else {
                flow.update(|f| f.submitting = false);
                return;
            };
            leptos::task::spawn_local(async move {
                match store.create_room(&current.form).await {
                    Ok(resp) => {
                        flow.update(RoomCreateFlow::close);
                        let target = resp.redirect.unwrap_or_else(|| "/rooms".to_owned());
                        crate::pages::login::navigate_to(&target);
                    }
                    Err(e) => flow.update(|f| f.apply_create_error(&e)),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = store;
        }
    };

    let edit = move |apply: fn(&mut CreateRoomForm, String)| {
        move |ev: leptos::ev::Event| {
            let value = event_target_value(&ev);
            flow.update(|f| apply(&mut f.form, value));
        }
    };

    view! {
        <Show when=move || dialog() != CreateDialog::Closed>
            <div class="dialog-backdrop" on:click=move |_| flow.update(RoomCreateFlow::close)></div>
            <div class="dialog" tabindex="-1" on:keydown=on_keydown>
                <Show when=move || dialog() == CreateDialog::HostWarning>
                    <h2>"You are already hosting a room"</h2>
                    <p>{move || format!("Close \"{}\" before creating a new room.", current_room_name())}</p>
                    <div class="dialog__actions">
                        <button class="btn" on:click=move |_| flow.update(RoomCreateFlow::close)>"OK"</button>
                    </div>
                </Show>
                <Show when=move || dialog() == CreateDialog::GuestConfirm>
                    <h2>"Leave your current room?"</h2>
                    <p>{move || format!("You will leave \"{}\" when the new room is created.", current_room_name())}</p>
                    <div class="dialog__actions">
                        <button class="btn" on:click=move |_| flow.update(RoomCreateFlow::close)>"Cancel"</button>
                        <button class="btn btn--primary" on:click=move |_| flow.update(RoomCreateFlow::confirm_and_open)>
                            "Continue"
                        </button>
                    </div>
                </Show>
                <Show when=move || dialog() == CreateDialog::Form>
                    <h2>"Create a room"</h2>
                    <form class="dialog__form" on:submit=on_submit>
                        <input
                            class="dialog__input"
                            type="text"
                            placeholder="Room name"
                            prop:value=move || flow.get().form.name
                            on:input=edit(|f, v| f.name = v)
                        />
                        <select
                            class="dialog__input"
                            prop:value=move || flow.get().form.game_version_id
                            on:change=edit(|f, v| f.game_version_id = v)
                        >
                            <option value="">"Select a game"</option>
                            <For
                                each=move || versions.get()
                                key=|v| v.id.to_string()
                                children=|v| view! { <option value=v.id.to_string()>{v.name}</option> }
                            />
                        </select>
                        <input
                            class="dialog__input"
                            type="number"
                            min="2"
                            max="4"
                            placeholder="Max players"
                            prop:value=move || flow.get().form.max_players
                            on:input=edit(|f, v| f.max_players = v)
                        />
                        <input
                            class="dialog__input"
                            type="password"
                            placeholder="Password (optional)"
                            prop:value=move || flow.get().form.password
                            on:input=edit(|f, v| f.password = v)
                        />
                        <input
                            class="dialog__input"
                            type="text"
                            placeholder="Target monster"
                            prop:value=move || flow.get().form.target_monster
                            on:input=edit(|f, v| f.target_monster = v)
                        />
                        <input
                            class="dialog__input"
                            type="text"
                            placeholder="Rank requirement"
                            prop:value=move || flow.get().form.rank_requirement
                            on:input=edit(|f, v| f.rank_requirement = v)
                        />
                        <textarea
                            class="dialog__input"
                            placeholder="Description"
                            prop:value=move || flow.get().form.description
                            on:input=edit(|f, v| f.description = v)
                        ></textarea>
                        <Show when=move || flow.get().form_error.is_some()>
                            <p class="dialog__error">{move || flow.get().form_error.unwrap_or_default()}</p>
                        </Show>
                        <div class="dialog__actions">
                            <button class="btn" type="button" on:click=move |_| flow.update(RoomCreateFlow::close)>
                                "Cancel"
                            </button>
                            <button
                                class="btn btn--primary"
                                type="submit"
                                disabled=move || { let f = flow.get(); f.submitting || !f.form.is_submittable() }
                            >
                                {move || if flow.get().submitting { "Creating..." } else { "Create" }}
                            </button>
                        </div>
                    </form>
                </Show>
            </div>
        </Show>
    }
}
