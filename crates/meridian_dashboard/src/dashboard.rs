// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::future::poll_fn;
use std::task::{Context, Poll};

use meridian::timing::DialClock;
use meridian::{Location, RefreshLoop, RefreshOptions};

use crate::lookup::LocationLookup;
use crate::store::LocationStore;
use crate::terminal::TerminalDisplay;
use crate::{Result, share};

/// One displayed location and the dial refreshing it.
#[derive(Debug)]
pub struct Slot {
    location: Location,
    dial: RefreshLoop<TerminalDisplay>,
}

impl Slot {
    fn start(clock: &DialClock, options: RefreshOptions, location: Location) -> Self {
        let mut dial = RefreshLoop::new(clock, TerminalDisplay::new(), options);

        if let Err(error) = dial.start(&location) {
            tracing::warn!(city = %location.city, %error, "location cannot be shown");
        }

        Self { location, dial }
    }

    /// The displayed location.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// The dial's current rendering.
    #[must_use]
    pub const fn display(&self) -> &TerminalDisplay {
        self.dial.display()
    }

    /// Whether the dial is refreshing. A location with an unusable timezone never is.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.dial.is_running()
    }

    /// The slot as one line of text: heading, dial and timezone description.
    #[must_use]
    pub fn line(&self) -> String {
        let heading = match self.location.subtitle() {
            Some(country) if !country.is_empty() => format!("{}, {country}", self.location.title()),
            _ => self.location.title().to_string(),
        };

        format!("{heading:<28}{}  {}", self.display(), self.location.description())
    }
}

/// The set of displayed locations, each with its own running dial.
///
/// All dials share one [`DialClock`], so [`DialClock::active_timers`] equals the number of
/// running slots. The dashboard holds no hidden state: the list is given at construction and
/// replaced explicitly through [`Dashboard::replace_locations`].
///
/// # Examples
///
/// ```
/// use meridian::timing::DialClock;
/// use meridian::{Location, RefreshOptions};
/// use meridian_dashboard::Dashboard;
/// use tick::runtime::InactiveClock;
///
/// let (clock, _driver) = InactiveClock::default().activate();
/// let clock = DialClock::new(clock);
/// let mut dashboard = Dashboard::new(&clock, RefreshOptions::default(), vec![
///     Location::new("Nairobi", "Africa/Nairobi"),
/// ]);
/// dashboard.add(Location::new("Lima", "America/Lima"));
/// assert_eq!(clock.active_timers(), 2);
///
/// let removed = dashboard.remove(0);
/// assert_eq!(removed.map(|location| location.city), Some("Nairobi".to_string()));
/// assert_eq!(clock.active_timers(), 1);
/// ```
#[derive(Debug)]
pub struct Dashboard {
    clock: DialClock,
    options: RefreshOptions,
    slots: Vec<Slot>,
}

impl Dashboard {
    /// Creates a dashboard showing `locations`.
    #[must_use]
    pub fn new(clock: &DialClock, options: RefreshOptions, locations: Vec<Location>) -> Self {
        let mut dashboard = Self {
            clock: clock.clone(),
            options,
            slots: Vec::with_capacity(locations.len()),
        };

        dashboard.replace_locations(locations);
        dashboard
    }

    /// Appends `location` and starts its dial.
    ///
    /// A location whose timezone is unknown is still added; its slot shows placeholders.
    pub fn add(&mut self, location: Location) -> &Slot {
        tracing::info!(city = %location.city, timezone = %location.timezone, "location added");

        let index = self.slots.len();
        self.slots.push(Slot::start(&self.clock, self.options, location));
        &self.slots[index]
    }

    /// Removes the slot at `index`, stopping its dial.
    ///
    /// Returns `None` when `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Option<Location> {
        if index >= self.slots.len() {
            return None;
        }

        let slot = self.slots.remove(index);
        tracing::info!(city = %slot.location.city, "location removed");
        Some(slot.location)
    }

    /// Replaces every slot with one per location in `locations`.
    pub fn replace_locations(&mut self, locations: Vec<Location>) {
        // Stop the old dials before starting new ones.
        self.slots.clear();
        self.slots
            .extend(locations.into_iter().map(|location| Slot::start(&self.clock, self.options, location)));

        tracing::debug!(count = self.slots.len(), "locations replaced");
    }

    /// The displayed locations, in order.
    #[must_use]
    pub fn locations(&self) -> Vec<Location> {
        self.slots.iter().map(|slot| slot.location.clone()).collect()
    }

    /// The slots, in order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The number of displayed locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no location is displayed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// A link that reopens the dashboard at `origin` with the same cities.
    #[must_use]
    pub fn share_link(&self, origin: &str) -> String {
        share::share_link(origin, &self.locations())
    }

    /// Ticks every slot whose timer has fired and returns how many ticked.
    ///
    /// Returns `Poll::Ready(0)` when no slot is running.
    pub fn poll_tick(&mut self, cx: &mut Context<'_>) -> Poll<usize> {
        let mut running = 0_usize;
        let mut ticked = 0_usize;

        for slot in &mut self.slots {
            match slot.dial.poll_tick(cx) {
                Poll::Ready(Some(_)) => {
                    running = running.saturating_add(1);
                    ticked = ticked.saturating_add(1);
                }
                Poll::Ready(None) => {}
                Poll::Pending => running = running.saturating_add(1),
            }
        }

        if ticked > 0 || running == 0 {
            Poll::Ready(ticked)
        } else {
            Poll::Pending
        }
    }

    /// Waits until at least one slot ticked and returns how many did.
    ///
    /// Returns `0` right away when no slot is running.
    pub async fn next_tick(&mut self) -> usize {
        poll_fn(|cx| self.poll_tick(cx)).await
    }

    /// Renders every slot, one line each.
    #[must_use]
    pub fn render(&self) -> String {
        if self.slots.is_empty() {
            return "No locations yet.".to_string();
        }

        self.slots.iter().map(Slot::line).collect::<Vec<_>>().join("\n")
    }
}

/// Determines the locations to show at startup.
///
/// When `query` names cities, as a share link does, they are looked up, persisted to `store`
/// and shown instead of the stored list. Otherwise the stored list is shown.
///
/// # Errors
///
/// Fails when a shared city cannot be found or the store cannot be read or written.
pub fn startup_locations(store: &LocationStore, lookup: &impl LocationLookup, query: Option<&str>) -> Result<Vec<Location>> {
    let shared = query.map(share::query_locations).unwrap_or_default();

    if shared.is_empty() {
        return store.load();
    }

    let stored = store.load()?;
    if !stored.is_empty() && same_cities(&stored, &shared) {
        tracing::debug!(count = stored.len(), "shared locations already stored");
        return Ok(stored);
    }

    let locations = lookup.lookup_all(shared.as_slice())?;
    store.save(&locations)?;

    tracing::info!(count = locations.len(), "showing shared locations");
    Ok(locations)
}

fn same_cities(stored: &[Location], shared: &[String]) -> bool {
    let mut stored: Vec<&str> = stored.iter().map(|location| location.city.as_str()).collect();
    let mut shared: Vec<&str> = shared.iter().map(String::as_str).collect();
    stored.sort_unstable();
    shared.sort_unstable();

    stored == shared
}
