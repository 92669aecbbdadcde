use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use pretty_assertions::assert_eq;
use trellis::{
    message::{IDCANCEL, IDOK, WM_COMMAND, WM_SIZE, makelong},
    testing::{EventLog, MessageProbe, RecordingLayout},
    widgets::{Composite, Dialog, PushButton},
    *,
};

fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    (count, move || {
        c.fetch_add(1, Ordering::SeqCst);
    })
}

fn handle(core: &Core, id: NodeId) -> Result<Handle> {
    core.handle_of(id).ok_or(Error::NodeNotFound(id))
}

#[test]
fn menu_and_accelerator_commands_trigger_actions() -> Result<()> {
    let (count, f) = counter();
    let mut actions = ActionRegistry::new();
    let id = actions.register(Action::new("Save").on_triggered(f))?;
    let mut core = Core::with_actions(actions);
    let log = EventLog::new();
    let c = core.create(MessageProbe::container("probe", &log));

    assert_eq!(
        core.send_message(c, &Message::menu(id))?,
        MessageResult::handled(0)
    );
    assert_eq!(
        core.send_message(c, &Message::accelerator(id))?,
        MessageResult::handled(0)
    );
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert!(log.is_empty());

    // Unknown identifiers fall through to the widget.
    let unknown = Message::menu(id + 100);
    assert_eq!(core.send_message(c, &unknown)?, MessageResult::default());
    assert_eq!(log.entries(), vec![format!("probe:{unknown:?}")]);
    Ok(())
}

#[test]
fn disabled_actions_still_trigger() -> Result<()> {
    let (count, f) = counter();
    let mut core = Core::new();
    let id = core
        .actions_mut()
        .register(Action::new("Quit").on_triggered(f))?;
    if let Some(a) = core.actions_mut().get_mut(id) {
        a.set_enabled(false);
    }
    let c = core.create(Composite::new());
    core.send_message(c, &Message::menu(id))?;
    assert_eq!(count.load(Ordering::SeqCst), 1);
    Ok(())
}

/// A dialog holding a composite that holds OK and Cancel buttons.
fn dialog() -> Result<(Core, NodeId, NodeId, NodeId, Arc<AtomicUsize>, Arc<AtomicUsize>)> {
    let mut core = Core::new();
    let (oks, ok_f) = counter();
    let (cancels, cancel_f) = counter();
    let ok = core.create(PushButton::new("OK").on_clicked(ok_f));
    let cancel = core.create(PushButton::new("Cancel").on_clicked(cancel_f));
    let dlg = core.create(
        Dialog::new()
            .with_default_button(ok)
            .with_cancel_button(cancel),
    );
    let body = core.create(Composite::new());
    core.container_mut(dlg)?.push(body)?;
    core.container_mut(body)?.push(ok)?;
    core.container_mut(body)?.push(cancel)?;
    Ok((core, body, ok, cancel, oks, cancels))
}

#[test]
fn ok_and_cancel_click_the_dialog_buttons() -> Result<()> {
    let (mut core, body, _, _, oks, cancels) = dialog()?;
    core.send_message(body, &Message::menu(IDOK))?;
    core.send_message(body, &Message::menu(IDCANCEL))?;
    core.send_message(body, &Message::menu(IDCANCEL))?;
    assert_eq!(oks.load(Ordering::SeqCst), 1);
    assert_eq!(cancels.load(Ordering::SeqCst), 2);

    // Accelerators with the same identifiers do not click.
    core.send_message(body, &Message::accelerator(IDOK))?;
    assert_eq!(oks.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn hidden_or_disabled_buttons_are_not_clicked() -> Result<()> {
    let (mut core, body, ok, cancel, oks, cancels) = dialog()?;
    core.set_enabled(ok, false)?;
    core.set_visible(cancel, false)?;
    core.send_message(body, &Message::menu(IDOK))?;
    core.send_message(body, &Message::menu(IDCANCEL))?;
    assert_eq!(oks.load(Ordering::SeqCst), 0);
    assert_eq!(cancels.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn control_commands_are_redispatched_to_the_control() -> Result<()> {
    let mut core = Core::new();
    let log = EventLog::new();
    let c = core.create(MessageProbe::container("parent", &log));
    let leaf = core.create(MessageProbe::leaf("child", &log));
    core.container_mut(c)?.push(leaf)?;

    let msg = Message::control(7, 3, handle(&core, leaf)?);
    assert_eq!(core.send_message(c, &msg)?, MessageResult::handled(0));
    assert_eq!(log.entries(), vec![format!("child:{msg:?}")]);
    Ok(())
}

#[test]
fn button_clicks_arrive_through_the_container() -> Result<()> {
    let (mut core, body, ok, _, oks, _) = dialog()?;
    let raw = Message::from_raw(
        WM_COMMAND,
        makelong(10, 0),
        handle(&core, ok)?.0 as isize,
        None,
    );
    core.send_message(body, &raw)?;
    assert_eq!(oks.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn notify_result_is_forwarded_verbatim() -> Result<()> {
    let mut core = Core::new();
    let log = EventLog::new();
    let c = core.create(MessageProbe::container("parent", &log));
    let leaf = core.create(MessageProbe::leaf("child", &log).answering(MessageResult {
        value: 42,
        handled: false,
    }));
    core.container_mut(c)?.push(leaf)?;

    let msg = Message::Notify(NotifyHeader {
        from: handle(&core, leaf)?,
        id: 7,
        code: -2,
    });
    assert_eq!(
        core.send_message(c, &msg)?,
        MessageResult {
            value: 42,
            handled: false
        }
    );

    // A header naming no known widget goes to default processing.
    log.clear();
    let stray = Message::Notify(NotifyHeader {
        from: Handle(0xdead),
        id: 7,
        code: -2,
    });
    core.send_message(c, &stray)?;
    assert_eq!(log.entries(), vec![format!("parent:{stray:?}")]);
    Ok(())
}

#[test]
fn size_messages_update_layout_then_fall_through() -> Result<()> {
    let mut core = Core::new();
    let log = EventLog::new();
    let c = core.create(MessageProbe::container("parent", &log));
    let (layout, _probe) = RecordingLayout::new("layout", &log);
    core.container_mut(c)?.set_layout(Some(Box::new(layout)))?;

    let size = Message::from_raw(WM_SIZE, 0, makelong(120, 80) as isize, None);
    core.send_message(c, &size)?;
    assert_eq!(core.bounds(c).expanse(), Expanse::new(120, 80));

    let sizing = Message::Sizing { edge: 8 };
    core.send_message(c, &sizing)?;
    assert_eq!(
        log.entries(),
        vec![
            "layout:update(false)".to_string(),
            format!("parent:{size:?}"),
            "layout:update(false)".to_string(),
            format!("parent:{sizing:?}"),
        ]
    );
    Ok(())
}

#[test]
fn layout_failure_aborts_size_handling() -> Result<()> {
    let mut core = Core::new();
    let log = EventLog::new();
    let c = core.create(MessageProbe::container("parent", &log));
    let (layout, probe) = RecordingLayout::new("layout", &log);
    core.container_mut(c)?.set_layout(Some(Box::new(layout)))?;
    probe.fail_updates(true);

    let res = core.send_message(c, &Message::size(Expanse::new(10, 10)));
    assert_eq!(res, Err(Error::Layout("layout: injected failure".into())));
    assert_eq!(log.entries(), vec!["layout:update(false)"]);
    // The layout is restored after a failed pass.
    assert!(core.layout(c).is_some());
    Ok(())
}

#[test]
fn other_messages_go_to_default_processing() -> Result<()> {
    let mut core = Core::new();
    let log = EventLog::new();
    let c = core.create(MessageProbe::container("parent", &log));
    let msg = Message::from_raw(0x0400, 1, 2, None);
    core.send_message(c, &msg)?;
    assert_eq!(log.entries(), vec![format!("parent:{msg:?}")]);
    Ok(())
}
