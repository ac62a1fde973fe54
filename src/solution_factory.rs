//! Search pipeline turning a [`Query`] into ranked round-trip solutions.
//!
//! Stages run strictly in order: discover places, resolve outward and
//! return itineraries, filter and rank by trip duration, attach forecasts,
//! filter by weather, truncate. Stages 2 and 4 fan out to the providers
//! with bounded concurrency and wait for every call before moving on.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use crate::config::PipelineConfig;
use crate::error::Stage;
use crate::filters::{filter_by_trip_duration, filter_by_weather};
use crate::models::{Place, Query, Solution, TimeAnchor};
use crate::places::PlaceFinder;
use crate::routing::ItineraryResolver;
use crate::weather::ForecastProvider;
use crate::{Result, TripError};

/// Result of resolving both itineraries for one place
enum RouteOutcome {
    Resolved(Box<Solution>),
    NoRoute,
    Failed(TripError),
}

pub struct SolutionFactory {
    places: Arc<dyn PlaceFinder>,
    routes: Arc<dyn ItineraryResolver>,
    forecasts: Arc<dyn ForecastProvider>,
    config: PipelineConfig,
}

impl SolutionFactory {
    #[must_use]
    pub fn new(
        places: Arc<dyn PlaceFinder>,
        routes: Arc<dyn ItineraryResolver>,
        forecasts: Arc<dyn ForecastProvider>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            places,
            routes,
            forecasts,
            config,
        }
    }

    /// Run the whole pipeline.
    ///
    /// Returns at most `query.max_results` solutions ordered by ascending
    /// total trip duration. An empty list means nothing matched;
    /// [`TripError::Exhausted`] means the providers could not be reached.
    #[instrument(skip(self, query), fields(place_type = %query.place_type, radius = query.radius))]
    pub async fn execute(&self, query: &Query) -> Result<Vec<Solution>> {
        query.validate()?;

        let places = self.discover_places(query).await?;
        if places.is_empty() {
            info!("No places found");
            return Ok(Vec::new());
        }

        let candidates = self.resolve_itineraries(query, places).await?;
        let candidates = filter_by_trip_duration(candidates, query.max_walk, query.max_travel);
        info!("{} candidates within travel budget", candidates.len());

        let candidates = self.attach_forecasts(query, candidates).await?;
        let mut solutions = filter_by_weather(candidates, &query.accepted_weather_codes);
        if !query.accepts_any_weather() {
            debug!("{} candidates accepted by weather", solutions.len());
        }

        solutions.truncate(query.max_results);
        info!("Returning {} solutions", solutions.len());
        Ok(solutions)
    }

    async fn discover_places(&self, query: &Query) -> Result<Vec<Place>> {
        let found = self
            .with_timeout(
                "places",
                self.places
                    .find_nearby(query.location, query.radius, &query.place_type),
            )
            .await;

        match found {
            Ok(places) => {
                info!("Discovered {} places", places.len());
                Ok(places)
            }
            Err(e) if e.is_provider_failure() => {
                Err(TripError::exhausted(Stage::Places, e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn resolve_itineraries(&self, query: &Query, places: Vec<Place>) -> Result<Vec<Solution>> {
        let total = places.len();
        let outcomes = self
            .fan_out(places, move |place| self.resolve_candidate(query, place))
            .await;

        let mut solutions = Vec::with_capacity(total);
        let mut failures = 0usize;
        let mut last_failure = None;
        for outcome in outcomes {
            match outcome {
                RouteOutcome::Resolved(solution) => solutions.push(*solution),
                RouteOutcome::NoRoute => {}
                // a rejected lookup costs its candidate, never the search
                RouteOutcome::Failed(e) => {
                    failures += 1;
                    last_failure = Some(e);
                }
            }
        }

        if failures == total {
            let reason = last_failure.map(|e| e.to_string()).unwrap_or_default();
            return Err(TripError::exhausted(
                Stage::Itineraries,
                format!("all {total} itinerary lookups failed: {reason}"),
            ));
        }
        if failures > 0 {
            warn!("{failures} of {total} places dropped after itinerary failures");
        }
        info!("Resolved round trips for {} of {} places", solutions.len(), total);
        Ok(solutions)
    }

    /// Outward leg departs at the interval start, return leg arrives by its end
    async fn resolve_candidate(&self, query: &Query, place: Place) -> RouteOutcome {
        let outward = self
            .with_timeout(
                "routing",
                self.routes.resolve(
                    query.location,
                    place.location,
                    TimeAnchor::DepartAt(query.interval.start()),
                ),
            )
            .await;
        let outward = match outward {
            Ok(Some(itinerary)) => itinerary,
            Ok(None) => {
                debug!("No outward route to {}", place.name);
                return RouteOutcome::NoRoute;
            }
            Err(e) => {
                debug!("Outward route to {} failed: {}", place.name, e);
                return RouteOutcome::Failed(e);
            }
        };

        let ret = self
            .with_timeout(
                "routing",
                self.routes.resolve(
                    place.location,
                    query.location,
                    TimeAnchor::ArriveBy(query.interval.end()),
                ),
            )
            .await;
        match ret {
            Ok(Some(itinerary)) => RouteOutcome::Resolved(Box::new(Solution::assemble(
                query.location,
                query.interval,
                place,
                outward,
                itinerary,
                self.config.wait_policy,
            ))),
            Ok(None) => {
                debug!("No return route from {}", place.name);
                RouteOutcome::NoRoute
            }
            Err(e) => {
                debug!("Return route from {} failed: {}", place.name, e);
                RouteOutcome::Failed(e)
            }
        }
    }

    /// Without any forecast the weather filter would silently reject every
    /// candidate, so a total provider failure is reported as exhausted when
    /// the query asks for specific conditions.
    async fn attach_forecasts(
        &self,
        query: &Query,
        candidates: Vec<Solution>,
    ) -> Result<Vec<Solution>> {
        let total = candidates.len();
        let language = query.language.as_deref();
        let attached = self
            .fan_out(candidates, move |solution| async move {
                let location = solution.destination().location;
                let forecasts = self
                    .with_timeout(
                        "weather",
                        self.forecasts
                            .daily_forecasts(location, &query.interval, language),
                    )
                    .await;
                match forecasts {
                    Ok(forecasts) => Ok((solution.with_forecasts(forecasts), None)),
                    Err(e) if e.is_provider_failure() => {
                        warn!(
                            "No forecast for {}: {}",
                            solution.destination().name,
                            e
                        );
                        Ok((solution, Some(e)))
                    }
                    Err(e) => Err(e),
                }
            })
            .await;

        let mut solutions = Vec::with_capacity(total);
        let mut failures = 0usize;
        let mut last_failure = None;
        for result in attached {
            let (solution, failure) = result?;
            if let Some(e) = failure {
                failures += 1;
                last_failure = Some(e);
            }
            solutions.push(solution);
        }

        if total > 0 && failures == total && !query.accepts_any_weather() {
            let reason = last_failure.map(|e| e.to_string()).unwrap_or_default();
            return Err(TripError::exhausted(
                Stage::Forecasts,
                format!("all {total} forecast lookups failed: {reason}"),
            ));
        }
        Ok(solutions)
    }

    /// Run `task` over every item, at most `concurrency` at a time, and
    /// return the outputs in input order once all have finished.
    async fn fan_out<T, O, F, Fut>(&self, items: Vec<T>, task: F) -> Vec<O>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = O>,
    {
        let semaphore = Semaphore::new(self.config.concurrency.max(1));
        let semaphore = &semaphore;
        let task = &task;
        join_all(items.into_iter().map(move |item| async move {
            // the semaphore is never closed
            let _permit = semaphore.acquire().await.ok();
            task(item).await
        }))
        .await
    }

    /// Bound a provider call; an expired call counts as a provider failure
    async fn with_timeout<T>(
        &self,
        provider: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let limit = self.config.call_timeout();
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(TripError::provider_unavailable(
                provider,
                format!("no answer within {}s", limit.as_secs()),
            )),
        }
    }
}
