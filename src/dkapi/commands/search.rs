use super::{CmdMessage, CmdResult};
use crate::config::Endpoints;
use crate::error::{DkapiError, Result};
use crate::http::{trace_response, HttpRequest, Transport};
use crate::model::State;
use crate::output::render_json;
use crate::parametrics::ParametricsCache;
use serde_json::{json, Value};

pub const MEDIA_LINKS: &str = "MediaLinks";
pub const PRIMARY_PHOTO: &str = "PrimaryPhoto";
pub const PRIMARY_DATASHEET: &str = "PrimaryDatasheet";

/// Output shaping for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub compact: bool,
    pub remove_media_links: bool,
    pub remove_primary_photo: bool,
    pub remove_primary_datasheet: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Value),
    NotFound,
    TransientError(String),
}

/// Issue the search call. Any non-2xx status is a [`DkapiError::Search`].
pub fn fetch<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    state: &State,
    part_id: &str,
    quantity: u32,
) -> Result<Value> {
    let request = HttpRequest::post(endpoints.search_url().clone())
        .header("accept", "application/json")
        .header("x-digikey-locale-language", "en")
        .header("x-digikey-locale-currency", "usd")
        .header(
            "authorization",
            state.auth_context.access_token().unwrap_or_default(),
        )
        .header("content-type", "application/json")
        .header("x-ibm-client-id", state.client_id.as_str())
        .json(json!({
            "PartNumber": part_id.trim(),
            "Quantity": quantity,
        }));

    let response = transport.send(request)?;
    trace_response("part search", &response);

    if !response.is_success() {
        return Err(DkapiError::Search {
            status: response.status,
            body: response.body,
        });
    }

    let body: Value = serde_json::from_str(&response.body)?;
    tracing::trace!(body = %body, "search result");
    Ok(body)
}

/// Search for a part, record any new parametric attributes and shape the
/// result per `options`.
pub fn run<T: Transport>(
    transport: &T,
    endpoints: &Endpoints,
    state: &State,
    cache: &mut ParametricsCache,
    part_id: &str,
    quantity: u32,
    options: &SearchOptions,
) -> SearchOutcome {
    let body = match fetch(transport, endpoints, state, part_id, quantity) {
        Ok(body) => body,
        Err(DkapiError::Search {
            status: status @ (401 | 403),
            ..
        }) => {
            return SearchOutcome::TransientError(format!(
                "search endpoint rejected the access token (status {}); try REFRESH_AUTH",
                status
            ))
        }
        Err(DkapiError::Search { status, .. }) => {
            tracing::debug!(status, "search returned no results");
            return SearchOutcome::NotFound;
        }
        Err(e) => return SearchOutcome::TransientError(e.to_string()),
    };

    record_parametrics(&body, cache);
    shape(body, options)
}

/// Render an outcome for standard output. Both non-found variants print
/// `null`; a transient failure also carries a warning.
pub fn render(outcome: SearchOutcome, options: &SearchOptions) -> Result<CmdResult> {
    match outcome {
        SearchOutcome::Found(value) => {
            Ok(CmdResult::default().with_output(render_json(&value, options.compact)?))
        }
        SearchOutcome::NotFound => Ok(CmdResult::default().with_output("null")),
        SearchOutcome::TransientError(reason) => Ok(CmdResult::default()
            .with_output("null")
            .with_message(CmdMessage::warning(format!("Part search failed: {}", reason)))),
    }
}

fn record_parametrics(body: &Value, cache: &mut ParametricsCache) {
    let parts = body
        .get("Parts")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for entry in parts
        .iter()
        .filter_map(|part| part.get("ParametricData").and_then(Value::as_array))
        .flatten()
    {
        let id = match entry.get("Id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        let Some(text) = entry.get("Text").and_then(Value::as_str) else {
            continue;
        };
        if cache.register(id.as_str(), text) {
            tracing::debug!(id = %id, text, "new parametric attribute");
        }
    }
}

fn shape(mut body: Value, options: &SearchOptions) -> SearchOutcome {
    let count = body
        .get("Parts")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    match count {
        0 => SearchOutcome::NotFound,
        1 => {
            let mut part = body
                .get_mut("Parts")
                .and_then(|parts| parts.get_mut(0))
                .map(Value::take)
                .unwrap_or_default();
            prune(&mut part, options);
            SearchOutcome::Found(part)
        }
        _ => {
            if let Some(parts) = body.get_mut("Parts").and_then(Value::as_array_mut) {
                for part in parts {
                    prune(part, options);
                }
            }
            SearchOutcome::Found(body)
        }
    }
}

fn prune(part: &mut Value, options: &SearchOptions) {
    let Some(fields) = part.as_object_mut() else {
        return;
    };
    if options.remove_media_links {
        fields.shift_remove(MEDIA_LINKS);
    }
    if options.remove_primary_photo {
        fields.shift_remove(PRIMARY_PHOTO);
    }
    if options.remove_primary_datasheet {
        fields.shift_remove(PRIMARY_DATASHEET);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::authorize::tests::endpoints;
    use crate::http::mock::MockTransport;
    use crate::http::HttpResponse;
    use crate::store::memory::fixtures::authorized_state;

    fn single_part() -> Value {
        json!({
            "Parts": [{
                "DigiKeyPartNumber": "296-1395-5-ND",
                "ParametricData": [
                    {"Id": 69, "Text": "Mounting Type", "Value": "Through Hole"},
                    {"Id": "16", "Text": "Package / Case", "Value": "8-DIP"}
                ],
                "MediaLinks": [{"Url": "https://example.com/img.png"}],
                "PrimaryPhoto": "https://example.com/photo.jpg",
                "PrimaryDatasheet": "https://example.com/ds.pdf",
                "QuantityOnHand": 1234
            }]
        })
    }

    fn search(
        transport: &MockTransport,
        cache: &mut ParametricsCache,
        options: &SearchOptions,
    ) -> SearchOutcome {
        run(
            transport,
            &endpoints(),
            &authorized_state(),
            cache,
            "296-1395-5-ND",
            1,
            options,
        )
    }

    #[test]
    fn request_carries_auth_headers_and_body() {
        let transport = MockTransport::new().respond(HttpResponse::new(200, single_part().to_string()));
        let mut cache = ParametricsCache::new();

        run(
            &transport,
            &endpoints(),
            &authorized_state(),
            &mut cache,
            "  LM555CN  ",
            25,
            &SearchOptions::default(),
        );

        let request = &transport.requests()[0];
        assert_eq!(request.url.as_str(), "https://api.example.com/search");
        assert_eq!(request.header_value("authorization"), Some("old-access"));
        assert_eq!(request.header_value("x-ibm-client-id"), Some("abc"));
        assert_eq!(request.header_value("accept"), Some("application/json"));
        assert_eq!(
            request.body,
            crate::http::RequestBody::Json(json!({"PartNumber": "LM555CN", "Quantity": 25}))
        );
    }

    #[test]
    fn single_part_is_unwrapped() {
        let transport = MockTransport::new().respond(HttpResponse::new(200, single_part().to_string()));
        let mut cache = ParametricsCache::new();

        match search(&transport, &mut cache, &SearchOptions::default()) {
            SearchOutcome::Found(part) => {
                assert!(part.is_object());
                assert_eq!(part["DigiKeyPartNumber"], "296-1395-5-ND");
                assert!(part.get(MEDIA_LINKS).is_some());
            }
            other => panic!("expected a part, got {:?}", other),
        }
    }

    #[test]
    fn removal_flags_strip_only_those_fields() {
        let transport = MockTransport::new().respond(HttpResponse::new(200, single_part().to_string()));
        let mut cache = ParametricsCache::new();
        let options = SearchOptions {
            remove_media_links: true,
            remove_primary_photo: true,
            remove_primary_datasheet: true,
            ..SearchOptions::default()
        };

        let SearchOutcome::Found(part) = search(&transport, &mut cache, &options) else {
            panic!("expected a part");
        };

        let mut expected = single_part()["Parts"][0].clone();
        let fields = expected.as_object_mut().unwrap();
        fields.shift_remove(MEDIA_LINKS);
        fields.shift_remove(PRIMARY_PHOTO);
        fields.shift_remove(PRIMARY_DATASHEET);
        assert_eq!(part, expected);

        let keys: Vec<&String> = part.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["DigiKeyPartNumber", "ParametricData", "QuantityOnHand"]);
    }

    #[test]
    fn multiple_parts_stay_wrapped_and_each_is_pruned() {
        let body = json!({
            "Parts": [
                {"Id": 1, "PrimaryPhoto": "a.jpg"},
                {"Id": 2, "PrimaryPhoto": "b.jpg"}
            ],
            "Results": 2
        });
        let transport = MockTransport::new().respond(HttpResponse::new(200, body.to_string()));
        let mut cache = ParametricsCache::new();
        let options = SearchOptions {
            remove_primary_photo: true,
            ..SearchOptions::default()
        };

        let SearchOutcome::Found(found) = search(&transport, &mut cache, &options) else {
            panic!("expected results");
        };
        assert_eq!(found, json!({"Parts": [{"Id": 1}, {"Id": 2}], "Results": 2}));
    }

    #[test]
    fn parametric_data_is_cached_first_write_wins() {
        let transport = MockTransport::new().respond(HttpResponse::new(200, single_part().to_string()));
        let mut cache = ParametricsCache::new();
        cache.register("16", "Case");

        search(&transport, &mut cache, &SearchOptions::default());

        assert_eq!(cache.get("69"), Some("Mounting Type"));
        assert_eq!(cache.get("16"), Some("Case"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn not_found_status_is_not_found() {
        let transport = MockTransport::new().respond(HttpResponse::new(404, "Part not found"));
        let mut cache = ParametricsCache::new();

        let outcome = run(
            &transport,
            &endpoints(),
            &authorized_state(),
            &mut cache,
            "bad-part",
            1,
            &SearchOptions::default(),
        );

        assert_eq!(outcome, SearchOutcome::NotFound);
        assert!(cache.is_empty());

        let result = render(outcome, &SearchOptions::default()).unwrap();
        assert_eq!(result.output.as_deref(), Some("null"));
        assert!(result.messages.is_empty());
    }

    #[test]
    fn rejected_token_is_transient() {
        let transport = MockTransport::new().respond(HttpResponse::new(401, "Unauthorized"));
        let mut cache = ParametricsCache::new();

        let outcome = search(&transport, &mut cache, &SearchOptions::default());
        assert!(matches!(outcome, SearchOutcome::TransientError(ref m) if m.contains("401")));

        let result = render(outcome, &SearchOptions::default()).unwrap();
        assert_eq!(result.output.as_deref(), Some("null"));
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn network_failure_is_transient() {
        let transport = MockTransport::new().fail("timed out");
        let mut cache = ParametricsCache::new();

        let outcome = search(&transport, &mut cache, &SearchOptions::default());
        assert!(matches!(outcome, SearchOutcome::TransientError(ref m) if m.contains("timed out")));
    }

    #[test]
    fn empty_parts_is_not_found() {
        let transport =
            MockTransport::new().respond(HttpResponse::new(200, r#"{"Parts": []}"#));
        let mut cache = ParametricsCache::new();

        assert_eq!(
            search(&transport, &mut cache, &SearchOptions::default()),
            SearchOutcome::NotFound
        );
    }

    #[test]
    fn fetch_surfaces_search_errors() {
        let transport = MockTransport::new().respond(HttpResponse::new(400, "bad request"));
        let err = fetch(&transport, &endpoints(), &authorized_state(), "x", 1).unwrap_err();
        assert!(matches!(err, DkapiError::Search { status: 400, .. }));
    }

    #[test]
    fn compact_render() {
        let options = SearchOptions {
            compact: true,
            ..SearchOptions::default()
        };
        let result = render(SearchOutcome::Found(json!({"a": "Ω"})), &options).unwrap();
        assert_eq!(result.output.as_deref(), Some(r#"{"a":"\u03a9"}"#));
    }
}
