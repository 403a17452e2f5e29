//! Internal event router — delivers internal events along event routes.
//!
//! Routing runs in phases so no two tables are ever locked together:
//! [`match_routes`] runs under the route table lock, [`resolve_targets`]
//! under the device table lock, and [`dispatch`] with no lock held.

use std::collections::HashMap;
use std::sync::Arc;

use lighthub_domain::event::InternalEvent;
use lighthub_domain::route::EventRoute;
use tracing::debug;

use crate::collection::DeviceServiceCollection;

/// Routes keyed by source device address.
pub type RouteTable = HashMap<String, Vec<EventRoute>>;

/// An event paired with a route it fires.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    pub event: InternalEvent,
    pub route: EventRoute,
}

/// An event ready to be delivered to a live target.
pub struct Dispatch {
    pub event: InternalEvent,
    pub target_address: String,
    pub target: Arc<DeviceServiceCollection>,
    pub functionality: String,
}

/// Routes whose source event equals the event's service name, per event.
pub fn match_routes(events: &[InternalEvent], routes: &RouteTable) -> Vec<RouteMatch> {
    events
        .iter()
        .flat_map(|event| {
            routes
                .get(&event.source_address)
                .into_iter()
                .flatten()
                .filter(|route| route.source_event == event.service_name)
                .map(|route| RouteMatch {
                    event: event.clone(),
                    route: route.clone(),
                })
        })
        .collect()
}

/// Resolve each match's target address; unknown targets are dropped.
pub fn resolve_targets<F>(matches: Vec<RouteMatch>, lookup: F) -> Vec<Dispatch>
where
    F: Fn(&str) -> Option<Arc<DeviceServiceCollection>>,
{
    matches
        .into_iter()
        .filter_map(|RouteMatch { event, route }| {
            let Some(target) = lookup(&route.target_address) else {
                debug!(route = %route, "route target unknown, dropping event");
                return None;
            };
            Some(Dispatch {
                event,
                target_address: route.target_address,
                target,
                functionality: route.target_functionality,
            })
        })
        .collect()
}

pub fn dispatch(dispatches: Vec<Dispatch>) {
    for d in dispatches {
        debug!(
            source = %d.event.source_address,
            event = %d.event.service_name,
            target = %d.target_address,
            functionality = %d.functionality,
            "routing event"
        );
        d.target.process_internal_event(&d.event, &d.functionality);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        let mut routes = RouteTable::new();
        routes.insert(
            "button".to_string(),
            vec![
                EventRoute::new("Single", "lamp", "Toggle on/off"),
                EventRoute::new("Double", "lamp", "Step fade"),
                EventRoute::new("Single", "gone", "Toggle on/off"),
            ],
        );
        routes
    }

    #[test]
    fn should_match_routes_by_source_address_and_event_name() {
        let matches = match_routes(&[InternalEvent::push("button", "Single")], &table());
        let targets: Vec<&str> = matches
            .iter()
            .map(|m| m.route.target_address.as_str())
            .collect();
        assert_eq!(targets, ["lamp", "gone"]);
    }

    #[test]
    fn should_match_nothing_when_source_has_no_routes() {
        assert!(match_routes(&[InternalEvent::push("knob", "Single")], &table()).is_empty());
        assert!(match_routes(&[InternalEvent::push("button", "Long")], &table()).is_empty());
    }

    #[test]
    fn should_drop_matches_with_unknown_target() {
        let matches = match_routes(&[InternalEvent::push("button", "Single")], &table());
        let lamp = Arc::new(DeviceServiceCollection::new("lamp"));

        let dispatches = resolve_targets(matches, |address| {
            (address == "lamp").then(|| lamp.clone())
        });

        assert_eq!(dispatches.len(), 1);
        assert_eq!(dispatches[0].target_address, "lamp");
        assert_eq!(dispatches[0].functionality, "Toggle on/off");
    }
}
