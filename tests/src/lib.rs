pub mod utils;

#[cfg(test)]
mod test_full_event_flow;
#[cfg(test)]
mod test_lifecycle;
#[cfg(test)]
mod test_templates;
