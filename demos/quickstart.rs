use std::sync::Arc;

use route_dispatch::registry::EndpointRegistry;
use route_dispatch::{Endpoint, EndpointSelector, InMemoryRegistry, RouteValues};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Register endpoints under their route values
    let registry = Arc::new(InMemoryRegistry::with_endpoints(vec![
        Endpoint::new(
            "home",
            RouteValues::new()
                .with("controller", "Home")
                .with("action", "Index"),
        ),
        Endpoint::new(
            "orders",
            RouteValues::new()
                .with("controller", "Orders")
                .with("action", "List"),
        ),
    ]));

    let selector = EndpointSelector::new(registry.clone() as Arc<dyn EndpointRegistry>);

    // 2. Resolve a query (exact match)
    let matched = selector.select(
        &RouteValues::new()
            .with("controller", "Home")
            .with("action", "Index"),
    )?;
    println!("Exact: {:?}", matched.iter().map(|e| e.name()).collect::<Vec<_>>());

    // 3. Case differences fall back to the folded index
    let matched = selector.select(
        &RouteValues::new()
            .with("controller", "HOME")
            .with("action", "INDEX"),
    )?;
    println!("Folded: {:?}", matched.iter().map(|e| e.name()).collect::<Vec<_>>());

    // 4. Mutations are picked up on the next query
    registry.insert(Endpoint::new(
        "orders-v2",
        RouteValues::new()
            .with("controller", "Orders")
            .with("action", "List"),
    ));
    let matched = selector.select(
        &RouteValues::new()
            .with("controller", "Orders")
            .with("action", "List"),
    )?;
    println!("After insert: {:?}", matched.iter().map(|e| e.name()).collect::<Vec<_>>());

    Ok(())
}
