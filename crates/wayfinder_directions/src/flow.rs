//! Session controller for one directions view: endpoint state, route
//! fetching, step navigation, and every side effect on the shared map
//! surface. `teardown` undoes all of them.

use tracing::{debug, warn};
use wayfinder_providers::capabilities::{
    Bounds, Directions, Geolocation, IndoorServices, MapSurface, OverlayId, PlaceAutocomplete,
    PolylineStyle, PreferenceStore, SearchParams,
};
use wayfinder_routing::animation::{AnnotatedPath, PathAnimation};
use wayfinder_routing::format::UnitSystem;
use wayfinder_routing::geopoint::GeoPoint;
use wayfinder_routing::route::{Route, StepCursor, StepIndex};

use crate::endpoint::Endpoint;
use crate::error::DirectionsError;
use crate::normalize::normalize;
use crate::request::{RouteRequest, TravelMode};
use crate::resolver::{self, RouteParams};
use crate::search::{Candidate, EndpointSearch, SearchOutcome, DEFAULT_SEARCH_WINDOW};

pub const TRAVEL_MODE_PREF_KEY: &str = "wayfinder.travel-mode";

const SEARCH_RESULT_LIMIT: usize = 10;

const ROUTE_POLYLINE_STYLE: PolylineStyle = PolylineStyle {
    weight: 8,
    opacity: 0.35,
};
const PROGRESS_POLYLINE_STYLE: PolylineStyle = PolylineStyle {
    weight: 4,
    opacity: 1.0,
};

/// Viewport class; the on-map step switcher only exists on handsets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Breakpoint {
    Handset,
    Desktop,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EndpointSlot {
    Origin,
    Destination,
}

#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub locale: String,
    pub geolocation_enabled: bool,
    pub avoid_stairs: bool,
    pub country: Option<String>,
    pub breakpoint: Breakpoint,
    pub search_window: std::time::Duration,
}

impl Default for FlowConfig {
    fn default() -> FlowConfig {
        FlowConfig {
            locale: String::from("en-US"),
            geolocation_enabled: true,
            avoid_stairs: false,
            country: None,
            breakpoint: Breakpoint::Desktop,
            search_window: DEFAULT_SEARCH_WINDOW,
        }
    }
}

pub struct DirectionsFlow<D, I, P, G, M, S> {
    directions: D,
    indoor: I,
    places: P,
    geolocation: G,
    map: M,
    preferences: S,

    config: FlowConfig,
    units: UnitSystem,
    breakpoint: Breakpoint,
    search: EndpointSearch,

    origin: Option<Endpoint>,
    destination: Option<Endpoint>,
    travel_mode: TravelMode,
    avoid_stairs: bool,

    route: Option<Route>,
    step_index: Option<StepIndex>,
    cursor: StepCursor,

    route_overlay: Option<OverlayId>,
    progress_overlay: Option<OverlayId>,
    animation: Option<PathAnimation>,
    switcher_attached: bool,

    loading: bool,
    notice: Option<DirectionsError>,
    geolocation_notice_shown: bool,
}

impl<D, I, P, G, M, S> DirectionsFlow<D, I, P, G, M, S>
where
    D: Directions,
    I: IndoorServices,
    P: PlaceAutocomplete,
    G: Geolocation,
    M: MapSurface,
    S: PreferenceStore,
{
    pub fn new(
        directions: D,
        indoor: I,
        places: P,
        geolocation: G,
        map: M,
        preferences: S,
        config: FlowConfig,
    ) -> DirectionsFlow<D, I, P, G, M, S> {
        let travel_mode = preferences
            .get(TRAVEL_MODE_PREF_KEY)
            .and_then(|value| TravelMode::parse(&value))
            .unwrap_or(TravelMode::Walking);

        DirectionsFlow {
            units: UnitSystem::from_locale(&config.locale),
            breakpoint: config.breakpoint,
            search: EndpointSearch::new(config.search_window),
            avoid_stairs: config.avoid_stairs,
            directions,
            indoor,
            places,
            geolocation,
            map,
            preferences,
            config,
            origin: None,
            destination: None,
            travel_mode,
            route: None,
            step_index: None,
            cursor: StepCursor::inactive(),
            route_overlay: None,
            progress_overlay: None,
            animation: None,
            switcher_attached: false,
            loading: false,
            notice: None,
            geolocation_notice_shown: false,
        }
    }

    /// Populates both endpoints from deep-link parameters, resolving them
    /// concurrently, and requests a route once both are present. A missing
    /// origin is recoverable; an unresolvable destination id is not.
    pub async fn initialize(&mut self, params: &RouteParams) -> Result<(), DirectionsError> {
        let origin_future = resolver::resolve_origin(
            self.origin.as_ref(),
            params,
            &self.indoor,
            &self.geolocation,
            self.config.geolocation_enabled,
        );
        let destination_future = async {
            match &params.destination_id {
                Some(id) => resolver::resolve_destination(id, &self.indoor)
                    .await
                    .map(Some),
                None => Ok(None),
            }
        };

        let (origin_outcome, destination) = tokio::join!(origin_future, destination_future);
        let destination = destination?;
        let origin_outcome = origin_outcome?;

        if let Some(notice) = origin_outcome.notice {
            // The geolocation hint is surfaced at most once per session.
            if !self.geolocation_notice_shown {
                self.geolocation_notice_shown = true;
                self.notice = Some(notice);
            }
        }
        if let Some(endpoint) = origin_outcome.endpoint {
            self.origin = Some(endpoint);
        }
        if let Some(endpoint) = destination {
            self.destination = Some(endpoint);
        }

        self.maybe_request_route().await
    }

    pub fn origin(&self) -> Option<&Endpoint> {
        self.origin.as_ref()
    }

    pub fn destination(&self) -> Option<&Endpoint> {
        self.destination.as_ref()
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn preferences(&self) -> &S {
        &self.preferences
    }

    /// Current step as `(leg index, step index within leg)`.
    pub fn current_step(&self) -> Option<(usize, usize)> {
        let index = self.step_index.as_ref()?;
        index.unflatten(self.cursor.index()?)
    }

    /// One-shot session notice (geolocation hint), consumed by the reader.
    pub fn take_notice(&mut self) -> Option<DirectionsError> {
        self.notice.take()
    }

    pub async fn set_origin(&mut self, endpoint: Endpoint) -> Result<(), DirectionsError> {
        self.origin = Some(endpoint);
        self.maybe_request_route().await
    }

    pub async fn set_destination(&mut self, endpoint: Endpoint) -> Result<(), DirectionsError> {
        self.destination = Some(endpoint);
        self.maybe_request_route().await
    }

    /// Debounced free-text search over both endpoint sources.
    pub async fn search_endpoints(
        &self,
        query: &str,
    ) -> Result<SearchOutcome, DirectionsError> {
        let params = SearchParams {
            near: self.destination.as_ref().map(Endpoint::position),
            take: Some(SEARCH_RESULT_LIMIT),
            categories: Vec::new(),
        };

        self.search
            .run(
                query,
                &self.indoor,
                Some(&self.places),
                &params,
                self.config.country.as_deref(),
            )
            .await
    }

    /// Promotes a picked search candidate into the given endpoint slot.
    pub async fn select_candidate(
        &mut self,
        slot: EndpointSlot,
        candidate: &Candidate,
    ) -> Result<(), DirectionsError> {
        let endpoint = resolver::resolve_candidate(candidate, &self.places).await?;
        match slot {
            EndpointSlot::Origin => self.set_origin(endpoint).await,
            EndpointSlot::Destination => self.set_destination(endpoint).await,
        }
    }

    /// Switches the travel mode, persists the choice, and re-requests the
    /// route once when both endpoints are still set. Any displayed route is
    /// cleared first so a failed re-request leaves no stale rendering.
    pub async fn set_travel_mode(&mut self, mode: TravelMode) -> Result<(), DirectionsError> {
        if mode == self.travel_mode {
            return Ok(());
        }

        self.travel_mode = mode;
        self.preferences
            .set(TRAVEL_MODE_PREF_KEY, &mode.to_string());

        if self.route.is_some() {
            self.clear_route();
            return self.maybe_request_route().await;
        }
        Ok(())
    }

    /// Applies to the next request; an already displayed route is kept.
    pub fn set_avoid_stairs(&mut self, avoid: bool) {
        self.avoid_stairs = avoid;
    }

    async fn maybe_request_route(&mut self) -> Result<(), DirectionsError> {
        let request = match RouteRequest::build(
            self.origin.as_ref(),
            self.destination.as_ref(),
            self.travel_mode,
            self.avoid_stairs,
        ) {
            Ok(request) => request,
            // One endpoint is still pending; stay in the non-routed state.
            Err(DirectionsError::IncompleteEndpoints) => return Ok(()),
            Err(e) => return Err(e),
        };

        self.fetch_route(request).await
    }

    async fn fetch_route(&mut self, request: RouteRequest) -> Result<(), DirectionsError> {
        self.clear_route();
        self.loading = true;

        let result = self.fetch_and_render(request).await;
        self.loading = false;
        result
    }

    async fn fetch_and_render(&mut self, request: RouteRequest) -> Result<(), DirectionsError> {
        debug!("Requesting {} route", request.travel_mode());

        let raw = match self.directions.get_route(&request.query()).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Directions request failed: {}", e);
                return Err(DirectionsError::NoRoute);
            }
        };

        let route = normalize(raw, self.units, &self.indoor).await?;
        let step_index = StepIndex::new(&route);
        self.cursor.initialize(step_index.len());
        self.route = Some(route);
        self.step_index = Some(step_index);

        if self.breakpoint == Breakpoint::Handset {
            self.attach_switcher();
        }
        self.render_current_step().await;
        Ok(())
    }

    /// Advances to the next step; re-renders only on an actual move.
    pub async fn next_step(&mut self) {
        if self.cursor.next() {
            self.sync_switcher();
            self.render_current_step().await;
        }
    }

    pub async fn previous_step(&mut self) {
        if self.cursor.previous() {
            self.sync_switcher();
            self.render_current_step().await;
        }
    }

    /// Jumps to a step addressed by leg; returns whether the cursor moved.
    pub async fn jump_to(&mut self, leg_index: usize, step_index: usize) -> bool {
        let Some(flat) = self
            .step_index
            .as_ref()
            .and_then(|index| index.flatten(leg_index, step_index))
        else {
            return false;
        };

        if self.cursor.jump_to(flat) {
            self.sync_switcher();
            self.render_current_step().await;
            return true;
        }
        false
    }

    /// Index change reported by the on-map switcher. The control only moves
    /// one position at a time, so this maps to next/previous.
    pub async fn on_switcher_index(&mut self, index: usize) {
        let Some(current) = self.cursor.index() else {
            return;
        };
        if index > current {
            self.next_step().await;
        } else if index < current {
            self.previous_step().await;
        }
    }

    pub fn set_breakpoint(&mut self, breakpoint: Breakpoint) {
        if breakpoint == self.breakpoint {
            return;
        }
        self.breakpoint = breakpoint;

        if self.route.is_none() {
            return;
        }
        match breakpoint {
            Breakpoint::Handset => self.attach_switcher(),
            Breakpoint::Desktop => self.detach_switcher(),
        }
    }

    /// Advances the progress animation; the host calls this from its frame
    /// timer and may stop once the returned flag reports completion.
    pub fn animation_tick(&mut self, elapsed: f64) -> bool {
        let Some(animation) = &mut self.animation else {
            return true;
        };

        let frame = animation.tick(elapsed);
        if let Some(id) = self.progress_overlay {
            self.map.update_polyline(id, &frame.path);
        }
        if frame.done {
            self.animation = None;
        }
        frame.done
    }

    /// Drops the route and undoes every map side effect. Idempotent.
    pub fn clear_route(&mut self) {
        self.dispose_overlays();
        self.detach_switcher();
        self.route = None;
        self.step_index = None;
        self.cursor.clear();
    }

    /// Leaves the shared map exactly as it was before this view touched it.
    pub fn teardown(&mut self) {
        self.clear_route();
    }

    fn attach_switcher(&mut self) {
        let Some(index) = &self.step_index else {
            return;
        };
        if !self.switcher_attached && !index.is_empty() {
            self.map.attach_step_switcher(index.len());
            self.switcher_attached = true;
            self.sync_switcher();
        }
    }

    fn detach_switcher(&mut self) {
        if self.switcher_attached {
            self.map.detach_step_switcher();
            self.switcher_attached = false;
        }
    }

    fn sync_switcher(&mut self) {
        if self.switcher_attached
            && let Some(index) = self.cursor.index()
        {
            self.map.update_step_switcher(index);
        }
    }

    fn dispose_overlays(&mut self) {
        self.animation = None;
        if let Some(id) = self.route_overlay.take() {
            self.map.remove_overlay(id);
        }
        if let Some(id) = self.progress_overlay.take() {
            self.map.remove_overlay(id);
        }
    }

    /// Renders the step under the cursor: switches the active floor when
    /// the step ends on a different one, fits the viewport, and draws the
    /// step polyline plus the animated progress polyline over it. Transit
    /// legs render the whole leg path; their steps are stop sequences, not
    /// separately walkable segments.
    async fn render_current_step(&mut self) {
        self.dispose_overlays();

        let (path, floor) = {
            let (Some(route), Some(index), Some(flat)) = (
                self.route.as_ref(),
                self.step_index.as_ref(),
                self.cursor.index(),
            ) else {
                return;
            };
            let Some((leg_index, step)) = index.step_at(route, flat) else {
                return;
            };
            let leg = &route.legs()[leg_index];

            let path: Vec<GeoPoint> = if leg.is_transit() {
                leg.path()
            } else {
                step.path.clone()
            };
            let floor = step
                .end_floor
                .clone()
                .or_else(|| leg.body().end.floor.clone());
            (path, floor)
        };

        if path.is_empty() {
            return;
        }

        if let Some(floor) = floor
            && self.map.floor().as_deref() != Some(floor.as_str())
        {
            self.map.set_floor(&floor);
        }

        if let Some(bounds) = Bounds::from_points(&path) {
            self.map.fit_bounds(bounds).await;
        }

        self.route_overlay = Some(self.map.draw_polyline(&path, ROUTE_POLYLINE_STYLE));
        self.progress_overlay = Some(self.map.draw_polyline(&[], PROGRESS_POLYLINE_STYLE));
        self.animation = AnnotatedPath::new(path).map(PathAnimation::new);
    }
}
