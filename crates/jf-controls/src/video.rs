//! Embedded application controls.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use jf_core::{Join, SigCache, SigKind, SigMapCache};
use jf_panel::{PanelDevice, SigEndpoint, SmartObject, SubscriptionId};

use crate::base::{Control, ControlBase};
use crate::error::{ControlError, ControlResult};
use crate::event::Event;
use crate::offsets::{ControlParent, Indexed};

const VIDEO_MAX_SOURCES_LIMIT: u16 = 100;

// Embedded video smart-object joins.
const VIDEO_ON_OFF_JOIN: Join = Join(1);
const VIDEO_PRESS_OUTPUT_JOIN: Join = Join(2);
const VIDEO_PLAYING_OUTPUT_JOIN: Join = Join(3);
const VIDEO_SNAPSHOT_OUTPUT_JOIN: Join = Join(4);
const VIDEO_SOURCE_JOIN: Join = Join(1);
const VIDEO_SOURCE_TYPE_START_JOIN: u16 = 50;
const VIDEO_SNAPSHOT_REFRESH_START_JOIN: u16 = 150;
const VIDEO_URL_START_JOIN: u16 = 50;
const VIDEO_SNAPSHOT_URL_START_JOIN: u16 = 150;

/// An enhanced embedded video window driven through a smart object.
///
/// On/off control should be enabled on the panel side; it is pulsed here to
/// work around sources that intermittently fail to switch.
pub struct EmbeddedVideo {
    inner: Arc<VideoInner>,
}

struct VideoInner {
    base: ControlBase,
    smart: Arc<dyn SmartObject>,
    max_sources: AtomicU16,
    on_off: SigCache<bool>,
    source: SigCache<u16>,
    source_types: SigMapCache<u16, u16>,
    refresh_times: SigMapCache<u16, u16>,
    urls: SigMapCache<u16, String>,
    snapshot_urls: SigMapCache<u16, String>,
    is_pressed: Mutex<bool>,
    is_playing: Mutex<bool>,
    is_snapshot_showing: Mutex<bool>,
    on_pressed_changed: Event<bool>,
    on_playing_changed: Event<bool>,
    on_snapshot_changed: Event<bool>,
    subscriptions: Mutex<Vec<(Join, SubscriptionId)>>,
}

impl EmbeddedVideo {
    pub fn new(panel: Arc<dyn PanelDevice>, smart_object_id: u32) -> ControlResult<Self> {
        Self::build(panel, smart_object_id, None)
    }

    pub fn with_parent(
        panel: Arc<dyn PanelDevice>,
        smart_object_id: u32,
        parent: Arc<dyn ControlParent>,
    ) -> ControlResult<Self> {
        Self::build(panel, smart_object_id, Some(parent))
    }

    fn build(
        panel: Arc<dyn PanelDevice>,
        smart_object_id: u32,
        parent: Option<Arc<dyn ControlParent>>,
    ) -> ControlResult<Self> {
        let smart = panel.smart_object(smart_object_id)?;
        let inner = Arc::new(VideoInner {
            base: ControlBase::new(panel, parent, 0),
            smart,
            max_sources: AtomicU16::new(0),
            on_off: SigCache::new(),
            source: SigCache::new(),
            source_types: SigMapCache::new(),
            refresh_times: SigMapCache::new(),
            urls: SigMapCache::new(),
            snapshot_urls: SigMapCache::new(),
            is_pressed: Mutex::new(false),
            is_playing: Mutex::new(false),
            is_snapshot_showing: Mutex::new(false),
            on_pressed_changed: Event::new(),
            on_playing_changed: Event::new(),
            on_snapshot_changed: Event::new(),
            subscriptions: Mutex::new(Vec::new()),
        });

        let mut subscriptions = Vec::new();
        for (join, select) in [
            (VIDEO_PRESS_OUTPUT_JOIN, 0usize),
            (VIDEO_PLAYING_OUTPUT_JOIN, 1),
            (VIDEO_SNAPSHOT_OUTPUT_JOIN, 2),
        ] {
            let weak = Arc::downgrade(&inner);
            let id = inner.smart.register_output_sig(
                join,
                SigKind::Digital,
                Arc::new(move |event| {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let Some(value) = event.value.as_digital() else {
                        return;
                    };
                    match select {
                        0 => inner.update_flag(&inner.is_pressed, &inner.on_pressed_changed, value),
                        1 => inner.update_flag(&inner.is_playing, &inner.on_playing_changed, value),
                        _ => inner.update_flag(
                            &inner.is_snapshot_showing,
                            &inner.on_snapshot_changed,
                            value,
                        ),
                    }
                }),
            );
            subscriptions.push((join, id));
        }
        *inner.subscriptions.lock().unwrap() = subscriptions;

        Ok(Self { inner })
    }

    /// The number of sources the window is configured for.
    pub fn max_sources(&self) -> u16 {
        self.inner.max_sources.load(Ordering::Relaxed)
    }

    pub fn set_max_sources(&self, max_sources: u16) {
        self.inner
            .max_sources
            .store(max_sources.min(VIDEO_MAX_SOURCES_LIMIT), Ordering::Relaxed);
    }

    /// Turn the video window on or off.
    pub fn set_on_off(&self, state: bool) {
        self.inner.on_off.send_if_changed(state, |v| {
            self.inner.smart.send_input_digital(VIDEO_ON_OFF_JOIN, *v)
        });
    }

    /// Select the source shown by the window.
    ///
    /// While the window is on, the on/off join is pulsed after a source
    /// change; without the pulse the panel sometimes keeps the old source.
    pub fn set_source(&self, source: u16) {
        let changed = self.inner.source.send_if_changed(source, |v| {
            self.inner.smart.send_input_analog(VIDEO_SOURCE_JOIN, *v)
        });
        if changed && self.inner.on_off.get() == Some(true) {
            self.inner.smart.send_input_digital(VIDEO_ON_OFF_JOIN, false);
            self.inner.smart.send_input_digital(VIDEO_ON_OFF_JOIN, true);
        }
    }

    /// Set the source type of the source at the given index.
    pub fn set_video_source_type(&self, index: u16, source_type: u16) -> ControlResult<()> {
        self.check_index(index)?;
        let join = Join::new(VIDEO_SOURCE_TYPE_START_JOIN.wrapping_add(index));
        self.inner.source_types.send_if_changed(index, source_type, |v| {
            self.inner.smart.send_input_analog(join, *v)
        });
        Ok(())
    }

    /// Set the snapshot refresh interval, in seconds, of the source at the
    /// given index. Zero disables snapshot refresh.
    pub fn set_video_snapshot_refresh_time(&self, index: u16, seconds: u16) -> ControlResult<()> {
        self.check_index(index)?;
        let join = Join::new(VIDEO_SNAPSHOT_REFRESH_START_JOIN.wrapping_add(index));
        self.inner.refresh_times.send_if_changed(index, seconds, |v| {
            self.inner.smart.send_input_analog(join, *v)
        });
        Ok(())
    }

    /// Set the streaming URL of the source at the given index.
    pub fn set_video_url(&self, index: u16, url: &str) -> ControlResult<()> {
        self.check_index(index)?;
        let join = Join::new(VIDEO_URL_START_JOIN.wrapping_add(index));
        self.inner.urls.send_if_changed(index, url.to_string(), |v| {
            self.inner.smart.send_input_serial(join, v)
        });
        Ok(())
    }

    /// Set the snapshot URL of the source at the given index.
    pub fn set_video_snapshot_url(&self, index: u16, url: &str) -> ControlResult<()> {
        self.check_index(index)?;
        let join = Join::new(VIDEO_SNAPSHOT_URL_START_JOIN.wrapping_add(index));
        self.inner
            .snapshot_urls
            .send_if_changed(index, url.to_string(), |v| {
                self.inner.smart.send_input_serial(join, v)
            });
        Ok(())
    }

    /// Whether the user is pressing the video window.
    pub fn is_pressed(&self) -> bool {
        *self.inner.is_pressed.lock().unwrap()
    }

    /// Whether video is currently playing.
    pub fn is_video_playing(&self) -> bool {
        *self.inner.is_playing.lock().unwrap()
    }

    /// Whether the snapshot image is showing.
    pub fn is_snapshot_showing(&self) -> bool {
        *self.inner.is_snapshot_showing.lock().unwrap()
    }

    pub fn on_pressed_changed(&self, handler: impl Fn(bool) + Send + Sync + 'static) {
        self.inner
            .on_pressed_changed
            .subscribe(move |value| handler(*value));
    }

    pub fn on_video_playing_changed(&self, handler: impl Fn(bool) + Send + Sync + 'static) {
        self.inner
            .on_playing_changed
            .subscribe(move |value| handler(*value));
    }

    pub fn on_snapshot_showing_changed(&self, handler: impl Fn(bool) + Send + Sync + 'static) {
        self.inner
            .on_snapshot_changed
            .subscribe(move |value| handler(*value));
    }

    fn check_index(&self, index: u16) -> ControlResult<()> {
        let max = self.max_sources();
        if index >= max {
            return Err(ControlError::IndexOutOfRange {
                what: "video source",
                index,
                max,
            });
        }
        Ok(())
    }
}

impl VideoInner {
    fn update_flag(&self, flag: &Mutex<bool>, event: &Event<bool>, value: bool) {
        {
            let mut current = flag.lock().unwrap();
            if *current == value {
                return;
            }
            *current = value;
        }
        event.raise(&value);
    }
}

impl Indexed for EmbeddedVideo {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for EmbeddedVideo {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl Drop for EmbeddedVideo {
    fn drop(&mut self) {
        for (join, id) in self.inner.subscriptions.lock().unwrap().drain(..) {
            self.inner
                .smart
                .unregister_output_sig(join, SigKind::Digital, id);
        }
        self.inner.on_pressed_changed.clear();
        self.inner.on_playing_changed.clear();
        self.inner.on_snapshot_changed.clear();
    }
}

/// An embedded application window with file-path and display-mode joins.
///
/// Writes are deliberate pass-throughs: the application object keeps no
/// caches and applies no parent offsets, matching the panel's handling of
/// these joins.
pub struct EmbeddedApp {
    base: ControlBase,
    file_path_join: Mutex<Join>,
    open_dialog_join: Mutex<Join>,
    display_mode_join: Mutex<Join>,
}

impl EmbeddedApp {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::with_parent_option(panel, None)
    }

    pub fn with_parent(panel: Arc<dyn SigEndpoint>, parent: Arc<dyn ControlParent>) -> Self {
        Self::with_parent_option(panel, Some(parent))
    }

    fn with_parent_option(
        panel: Arc<dyn SigEndpoint>,
        parent: Option<Arc<dyn ControlParent>>,
    ) -> Self {
        Self {
            base: ControlBase::new(panel, parent, 0),
            file_path_join: Mutex::new(Join::UNBOUND),
            open_dialog_join: Mutex::new(Join::UNBOUND),
            display_mode_join: Mutex::new(Join::UNBOUND),
        }
    }

    pub fn file_path_join(&self) -> Join {
        *self.file_path_join.lock().unwrap()
    }

    pub fn set_file_path_join(&self, join: Join) {
        *self.file_path_join.lock().unwrap() = join;
    }

    pub fn open_dialog_join(&self) -> Join {
        *self.open_dialog_join.lock().unwrap()
    }

    pub fn set_open_dialog_join(&self, join: Join) {
        *self.open_dialog_join.lock().unwrap() = join;
    }

    pub fn display_mode_join(&self) -> Join {
        *self.display_mode_join.lock().unwrap()
    }

    pub fn set_display_mode_join(&self, join: Join) {
        *self.display_mode_join.lock().unwrap() = join;
    }

    /// Set the file or URL the application loads.
    pub fn set_file_path(&self, path: &str) -> ControlResult<()> {
        let join = self.file_path_join();
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin { op: "set file path" });
        }
        self.base.panel().send_input_serial(join, path);
        Ok(())
    }

    /// Open or close the application's file dialog.
    pub fn open_file_dialog(&self, open: bool) -> ControlResult<()> {
        let join = self.open_dialog_join();
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin {
                op: "open file dialog",
            });
        }
        self.base.panel().send_input_digital(join, open);
        Ok(())
    }

    /// Resize the application to its designated display mode.
    pub fn set_display_mode(&self, display_mode: bool) -> ControlResult<()> {
        let join = self.display_mode_join();
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin {
                op: "set display mode",
            });
        }
        self.base.panel().send_input_digital(join, display_mode);
        Ok(())
    }
}

impl Indexed for EmbeddedApp {
    fn index(&self) -> u16 {
        self.base.index()
    }
}

impl Control for EmbeddedApp {
    fn base(&self) -> &ControlBase {
        &self.base
    }
}
