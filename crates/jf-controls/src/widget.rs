//! Composite widgets built from several controls.

use std::sync::{Arc, Mutex, Weak};

use chrono::{NaiveTime, Timelike};

use jf_panel::PanelDevice;

use crate::base::Control;
use crate::error::ControlResult;
use crate::event::Event;
use crate::offsets::ControlParent;
use crate::spinner::SpinnerList;

// Row layouts of the clock spinner template.
const CLOCK_HOUR_ROWS: u16 = 12;
const CLOCK_MINUTE_ROWS: [u16; 4] = [0, 15, 30, 45];

#[derive(Default)]
struct ClockState {
    hour_index: u16,
    minute_index: u16,
    am_pm_index: u16,
}

/// An hour, minute and AM/PM spinner combined into a time picker.
///
/// Assumes the panel template shows 12 hour rows, minute rows 00/15/30/45
/// and an AM/PM pair.
pub struct ClockSpinnerWidget {
    inner: Arc<ClockInner>,
}

struct ClockInner {
    hours: SpinnerList,
    minutes: SpinnerList,
    am_pm: SpinnerList,
    state: Mutex<ClockState>,
    on_time_changed: Event<NaiveTime>,
}

impl ClockSpinnerWidget {
    pub fn new(
        panel: Arc<dyn PanelDevice>,
        hours_smart_object_id: u32,
        minutes_smart_object_id: u32,
        am_pm_smart_object_id: u32,
        parent: Option<Arc<dyn ControlParent>>,
    ) -> ControlResult<Self> {
        let hours = match &parent {
            Some(parent) => {
                SpinnerList::with_parent(panel.clone(), hours_smart_object_id, parent.clone())?
            }
            None => SpinnerList::new(panel.clone(), hours_smart_object_id)?,
        };
        let minutes = match &parent {
            Some(parent) => {
                SpinnerList::with_parent(panel.clone(), minutes_smart_object_id, parent.clone())?
            }
            None => SpinnerList::new(panel.clone(), minutes_smart_object_id)?,
        };
        let am_pm = match &parent {
            Some(parent) => {
                SpinnerList::with_parent(panel.clone(), am_pm_smart_object_id, parent.clone())?
            }
            None => SpinnerList::new(panel.clone(), am_pm_smart_object_id)?,
        };

        let inner = Arc::new(ClockInner {
            hours,
            minutes,
            am_pm,
            state: Mutex::new(ClockState::default()),
            on_time_changed: Event::new(),
        });

        let weak = Arc::downgrade(&inner);
        inner.hours.on_item_selected(move |index| {
            ClockInner::select(&weak, |state| state.hour_index = index);
        });
        let weak = Arc::downgrade(&inner);
        inner.minutes.on_item_selected(move |index| {
            ClockInner::select(&weak, |state| state.minute_index = index);
        });
        let weak = Arc::downgrade(&inner);
        inner.am_pm.on_item_selected(move |index| {
            ClockInner::select(&weak, |state| state.am_pm_index = index);
        });

        Ok(Self { inner })
    }

    /// The currently selected time.
    pub fn selected_time(&self) -> NaiveTime {
        self.inner.selected_time()
    }

    /// Scroll the spinners to the closest representable time.
    pub fn set_time(&self, time: NaiveTime) {
        let hour = time.hour();
        let am = hour < 12;
        let mut hour12 = hour % 12;
        if hour12 == 0 {
            hour12 = 12;
        }
        let hour_index = (hour12 - 1) as u16;

        let minute = time.minute() as u16;
        let minute_index = CLOCK_MINUTE_ROWS
            .iter()
            .enumerate()
            .min_by_key(|(_, row)| row.abs_diff(minute))
            .map(|(index, _)| index as u16)
            .unwrap_or(0);

        let am_pm_index = if am { 0 } else { 1 };

        {
            let mut state = self.inner.state.lock().unwrap();
            state.hour_index = hour_index.min(CLOCK_HOUR_ROWS - 1);
            state.minute_index = minute_index;
            state.am_pm_index = am_pm_index;
        }

        self.inner.hours.select_item(hour_index);
        self.inner.minutes.select_item(minute_index);
        self.inner.am_pm.select_item(am_pm_index);
    }

    /// Raised when the user lands the spinners on a new time.
    pub fn on_time_changed(&self, handler: impl Fn(NaiveTime) + Send + Sync + 'static) {
        self.inner
            .on_time_changed
            .subscribe(move |time| handler(*time));
    }

    /// Visible while any of the spinners is visible.
    pub fn is_visible(&self) -> bool {
        self.controls().iter().any(|control| control.is_visible())
    }

    /// Enabled while any of the spinners is enabled.
    pub fn is_enabled(&self) -> bool {
        self.controls().iter().any(|control| control.is_enabled())
    }

    /// True when the widget and every ancestor is visible.
    pub fn is_visible_recursive(&self) -> bool {
        self.controls()
            .iter()
            .any(|control| control.is_visible_recursive())
    }

    /// Show or hide all of the spinners.
    pub fn show(&self, state: bool) -> ControlResult<()> {
        for control in self.controls() {
            control.show(state)?;
        }
        Ok(())
    }

    /// Enable or disable all of the spinners.
    pub fn enable(&self, state: bool) -> ControlResult<()> {
        for control in self.controls() {
            control.enable(state)?;
        }
        Ok(())
    }

    fn controls(&self) -> [&dyn Control; 3] {
        [&self.inner.hours, &self.inner.minutes, &self.inner.am_pm]
    }
}

impl ClockInner {
    fn select(weak: &Weak<ClockInner>, update: impl FnOnce(&mut ClockState)) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        {
            let mut state = inner.state.lock().unwrap();
            update(&mut state);
        }
        inner.on_time_changed.raise(&inner.selected_time());
    }

    fn selected_time(&self) -> NaiveTime {
        let state = self.state.lock().unwrap();
        let hour12 = u32::from(state.hour_index) + 1;
        let am = state.am_pm_index == 0;
        let hour24 = if am { hour12 % 12 } else { hour12 % 12 + 12 };
        let minute = CLOCK_MINUTE_ROWS
            .get(state.minute_index as usize)
            .copied()
            .unwrap_or(0);
        NaiveTime::from_hms_opt(hour24, u32::from(minute), 0).expect("in-range time")
    }
}
