use eca::animate::Animation;
use eca::config::EcaConfig;
use eca::error::Result as EcaResult;
use eca::evolve::Boundary;
use eca::export::ExportFormat;
use eca::render::{normalize_hex, FALLBACK_COLOR};
use eca::session::Session;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::ui_model::{parse_number, rule_columns, status_line};

mod canvas;
mod files;

/// Animation tick; roughly one row per display frame.
const FRAME_MS: i32 = 16;

pub fn start() {
    mount_to_body(|| view! { <App /> });
}

/// Run a session mutation; on failure report it and return false.
fn update_session(
    session: StoredValue<Session>,
    set_status: WriteSignal<String>,
    f: impl FnOnce(&mut Session) -> EcaResult<()>,
) -> bool {
    match session.try_update_value(f) {
        Some(Ok(())) => true,
        Some(Err(e)) => {
            set_status.set(format!("error: {e}"));
            false
        }
        None => false,
    }
}

#[component]
fn App() -> impl IntoView {
    let session = match Session::new(EcaConfig::default()) {
        Ok(s) => StoredValue::new(s),
        Err(e) => return view! { <p>{format!("startup failed: {e}")}</p> }.into_any(),
    };

    let canvas_ref: NodeRef<leptos::html::Canvas> = NodeRef::new();
    let animation: StoredValue<Option<Animation>> = StoredValue::new(None);

    let (status, set_status) = signal(String::new());
    // Bumped whenever the session changes so inputs and the rule grid re-read it.
    let (revision, set_revision) = signal(0u64);
    let (initial_text, set_initial_text) = signal(String::new());
    let (interval_id, set_interval_id) = signal::<Option<i32>>(None);

    let redraw_canvas = move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let res = session
            .with_value(|s| s.render())
            .map_err(|e| e.to_string())
            .and_then(|raster| canvas::draw_raster(&canvas, &raster));
        match res {
            Ok(()) => set_status.set(session.with_value(status_line)),
            Err(e) => set_status.set(format!("render failed: {e}")),
        }
    };

    let refresh = move || {
        redraw_canvas();
        set_revision.update(|r| *r += 1);
    };

    Effect::new(move |_| {
        if canvas_ref.get().is_some() {
            redraw_canvas();
        }
    });

    let stop = move || {
        if let Some(id) = interval_id.get_untracked() {
            if let Some(w) = web_sys::window() {
                w.clear_interval_with_handle(id);
            }
            set_interval_id.set(None);
        }
        // Keep only the rows the animation drew so Step continues from there.
        let drawn = animation.try_update_value(|a| {
            a.take().map(|mut anim| {
                anim.stop();
                anim.frames_emitted()
            })
        });
        if let Some(Some(rows)) = drawn {
            session.update_value(|s| s.truncate_to(rows));
        }
    };

    let run = move || {
        stop();
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let anim = match session.with_value(|s| s.animation()) {
            Ok(a) => a,
            Err(e) => {
                set_status.set(format!("error: {e}"));
                return;
            }
        };
        let (cols, rows, cell) = session.with_value(|s| {
            (s.config().width, s.config().height, s.cell_size())
        });
        canvas::resize(&canvas, cols, rows, cell);
        animation.set_value(Some(anim));

        let window = match web_sys::window() {
            Some(w) => w,
            None => {
                set_status.set("no window".to_string());
                return;
            }
        };

        let cb = Closure::wrap(Box::new(move || {
            let frame = animation
                .try_update_value(|a| a.as_mut().and_then(|a| a.next_frame()))
                .flatten();
            match frame {
                Some(Ok(frame)) => {
                    let palette = session.with_value(|s| s.palette().clone());
                    match canvas::draw_generation(
                        &canvas,
                        frame.index,
                        &frame.row,
                        &frame.trace,
                        &palette,
                        cell,
                    ) {
                        Ok(()) => set_status.set(format!("frame {}", frame.index)),
                        Err(e) => set_status.set(e),
                    }
                }
                Some(Err(e)) => {
                    set_status.set(format!("error: {e}"));
                    stop();
                }
                None => stop(),
            }
        }) as Box<dyn FnMut()>);

        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            FRAME_MS,
        ) {
            Ok(id) => {
                cb.forget();
                set_interval_id.set(Some(id));
                set_status.set("running".to_string());
            }
            Err(_) => set_status.set("failed to start animation".to_string()),
        }
    };

    let step = move || {
        stop();
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        match session.try_update_value(|s| s.step()) {
            Some(Ok(Some(frame))) => {
                let (palette, cell) = session.with_value(|s| (s.palette().clone(), s.cell_size()));
                match canvas::draw_generation(
                    &canvas,
                    frame.index,
                    &frame.row,
                    &frame.trace,
                    &palette,
                    cell,
                ) {
                    Ok(()) => set_status.set(session.with_value(status_line)),
                    Err(e) => set_status.set(e),
                }
            }
            Some(Ok(None)) => set_status.set("history is already at full height".to_string()),
            Some(Err(e)) => set_status.set(format!("error: {e}")),
            None => {}
        }
    };

    let export = move |format: ExportFormat| match session.with_value(|s| s.export(format)) {
        Ok((name, bytes)) => match files::download_bytes(&name, format.mime_type(), &bytes) {
            Ok(()) => set_status.set(format!("exported {name} ({} bytes)", bytes.len())),
            Err(e) => set_status.set(format!("export failed: {e}")),
        },
        Err(e) => set_status.set(format!("export failed: {e}")),
    };

    let rule_grid = move || {
        revision.track();
        let cols = session.with_value(|s| rule_columns(&s.rule(), s.palette()));
        cols.into_iter()
            .map(|col| {
                let idx = col.index;
                let (swatch, set_swatch) = signal(col.swatch.clone());
                view! {
                    <div class="rulecol">
                        <div class="pattern-big">{col.pattern.clone()}</div>
                        <div
                            class="out-big"
                            class:live=col.output == 1
                            on:click=move |_| {
                                if update_session(session, set_status, |s| s.toggle_rule_bit(idx)) {
                                    refresh();
                                }
                            }
                        >
                            {col.output.to_string()}
                        </div>
                        <input
                            type="text"
                            class="hex-small"
                            placeholder="#RRGGBB"
                            prop:value=col.color.clone()
                            on:input=move |ev| {
                                let v = event_target_value(&ev);
                                session.update_value(|s| s.palette_mut().set(idx, &v));
                                set_swatch.set(normalize_hex(&v, FALLBACK_COLOR));
                                redraw_canvas();
                            }
                        />
                        <div class="swatch" style:background=move || swatch.get()></div>
                    </div>
                }
            })
            .collect_view()
    };

    view! {
        <main class="eca">
            <h1>"Elementary Cellular Automata"</h1>

            <section class="controls">
                <label>
                    "Rule"
                    <input
                        type="number"
                        min="0"
                        max="255"
                        prop:value=move || {
                            revision.track();
                            session.with_value(|s| s.rule().code().to_string())
                        }
                        on:change=move |ev| {
                            let v = parse_number(&event_target_value(&ev));
                            if update_session(session, set_status, |s| s.set_rule_code(v)) {
                                refresh();
                            }
                        }
                    />
                </label>
                <label>
                    "Width"
                    <input
                        type="number"
                        min="3"
                        max="4096"
                        prop:value=move || {
                            revision.track();
                            session.with_value(|s| s.config().width.to_string())
                        }
                        on:change=move |ev| {
                            let v = parse_number(&event_target_value(&ev));
                            if update_session(session, set_status, |s| s.set_width(v)) {
                                refresh();
                            }
                        }
                    />
                </label>
                <label>
                    "Height"
                    <input
                        type="number"
                        min="1"
                        max="4096"
                        prop:value=move || {
                            revision.track();
                            session.with_value(|s| s.config().height.to_string())
                        }
                        on:change=move |ev| {
                            let v = parse_number(&event_target_value(&ev));
                            if update_session(session, set_status, |s| s.set_height(v)) {
                                refresh();
                            }
                        }
                    />
                </label>
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || {
                            revision.track();
                            session.with_value(|s| s.config().boundary.is_periodic())
                        }
                        on:change=move |ev| {
                            let b = Boundary::from_periodic(event_target_checked(&ev));
                            if update_session(session, set_status, |s| s.set_boundary(b)) {
                                refresh();
                            }
                        }
                    />
                    "Periodic boundary"
                </label>
            </section>

            <section class="initial">
                <textarea
                    placeholder="Initial row (0/1). Empty = single centered cell."
                    prop:value=move || initial_text.get()
                    on:change=move |ev| {
                        let v = event_target_value(&ev);
                        set_initial_text.set(v.clone());
                        if update_session(session, set_status, |s| s.set_initial_text(&v)) {
                            refresh();
                        }
                    }
                ></textarea>
            </section>

            <section class="buttons">
                <button on:click=move |_| run()>"Run"</button>
                <button on:click=move |_| stop()>"Pause"</button>
                <button on:click=move |_| step()>"Step"</button>
                <button on:click=move |_| {
                    stop();
                    if update_session(session, set_status, |s| s.recompute()) {
                        refresh();
                    }
                }>"Render"</button>
                <button on:click=move |_| {
                    set_initial_text.set(String::new());
                    if update_session(session, set_status, |s| s.reset_initial()) {
                        refresh();
                    }
                }>"Reset"</button>
                <button on:click=move |_| {
                    match session.try_update_value(|s| s.randomize()) {
                        Some(Ok(text)) => {
                            set_initial_text.set(text);
                            refresh();
                        }
                        Some(Err(e)) => set_status.set(format!("error: {e}")),
                        None => {}
                    }
                }>"Randomize"</button>
                <button on:click=move |_| export(ExportFormat::Json)>"Export JSON"</button>
                <button on:click=move |_| export(ExportFormat::Csv)>"Export CSV"</button>
            </section>

            <section class="rulegrid">{rule_grid}</section>

            <canvas node_ref=canvas_ref class="automaton"></canvas>

            <p class="status">{move || status.get()}</p>
        </main>
    }
    .into_any()
}
