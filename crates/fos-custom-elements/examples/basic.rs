//! Example: define a custom element and watch its lifecycle
//!
//! Run with `RUST_LOG=fos_custom_elements=trace` to see the engine's events.

use fos_custom_elements::{CustomElements, DefineOptions, ElementClass};
use fos_html::HtmlParser;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let doc = HtmlParser::new()
        .parse("<html><body><my-counter count=\"1\"></my-counter></body></html>");
    let mut registry = CustomElements::new(doc);

    let class = ElementClass::new("MyCounter")
        .observed_attributes(["count"])
        .on_connected(|_, node| println!("{node:?} connected"))
        .on_disconnected(|_, node| println!("{node:?} disconnected"))
        .on_attribute_changed(|_, node, change| {
            println!("{node:?} {}: {:?} -> {:?}", change.name, change.old_value, change.new_value);
        })
        .build();

    // The parsed <my-counter> is upgraded and connected right here
    if let Err(err) = registry.define("my-counter", class, DefineOptions::default()) {
        eprintln!("define failed: {err}");
        return;
    }

    let counters = registry.document().get_elements_by_tag_name("my-counter");
    for &counter in &counters {
        registry.document_mut().tree_mut().set_attribute(counter, "count", "2");
    }
    registry.process_mutations();

    for counter in counters {
        registry.document_mut().tree_mut().detach(counter);
    }
    registry.process_mutations();

    println!("fOS Custom Elements v{}", fos_custom_elements::VERSION);
}
