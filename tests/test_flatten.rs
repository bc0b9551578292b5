//! End-to-end conversion tests: realistic tree in, full row sequence out.

use callgrid::api::{ApiDescription, DescriptorParser};
use callgrid::domain::errors::DescriptorParseError;
use callgrid::domain::{AnnotationKeyCode, ApiType, ServiceTypeCode, SpanId};
use callgrid::registry::{MapAnnotationKeyRegistry, MapServiceTypeRegistry};
use callgrid::span::{Annotation, AnnotationValue, ApiMetadata, SpanException};
use callgrid::{flatten, CallTree, RecordBuilder, SpanAlignment};

/// Minimal method-signature parser: `pkg.Class.method(args)`.
struct SignatureParser;

impl DescriptorParser for SignatureParser {
    fn parse(&self, descriptor: &str) -> Result<ApiDescription, DescriptorParseError> {
        let open = descriptor
            .find('(')
            .ok_or_else(|| DescriptorParseError::new(descriptor, "no parameter list"))?;
        let dot = descriptor[..open]
            .rfind('.')
            .ok_or_else(|| DescriptorParseError::new(descriptor, "no class separator"))?;
        Ok(ApiDescription {
            simple_method_description: descriptor[dot + 1..].to_string(),
            simple_class_name: descriptor[..dot].rsplit('.').next().unwrap().to_string(),
        })
    }
}

fn registries() -> (MapServiceTypeRegistry, MapAnnotationKeyRegistry) {
    let mut service_types = MapServiceTypeRegistry::new();
    service_types.register(ServiceTypeCode(1010), "TOMCAT");
    service_types.register(ServiceTypeCode(2101), "MYSQL");
    let mut keys = MapAnnotationKeyRegistry::new();
    keys.register(AnnotationKeyCode(14), "SQL", true);
    keys.register(AnnotationKeyCode(40), "http.url", false);
    keys.register_error(AnnotationKeyCode(10_000_000), "API-METADATA-NOT-FOUND");
    (service_types, keys)
}

fn api_annotation(api_info: &str, line: Option<u32>, api_type: ApiType) -> Annotation {
    Annotation {
        key: callgrid::registry::API_METADATA,
        value: AnnotationValue::ApiMetadata(ApiMetadata {
            api_info: api_info.to_string(),
            line,
            api_type,
        }),
        authorized: true,
    }
}

/// A three-span trace: web request -> service method -> database query.
fn sample_tree() -> CallTree {
    let root = SpanAlignment {
        depth: 0,
        start_time: 1_700_000_000_000,
        elapsed: 120,
        agent_id: "agent-1".to_string(),
        application_id: "shop".to_string(),
        service_type: ServiceTypeCode(1010),
        has_child: true,
        transaction_id: "shop^1700000000000^1".to_string(),
        span_id: SpanId(1001),
        execution_ms: 20,
        annotations: vec![api_annotation(
            "com.example.CheckoutController.submit(Order order)",
            Some(42),
            ApiType::DEFAULT,
        )],
        is_span: true,
        ..SpanAlignment::default()
    };
    let mut tree = CallTree::new(root);

    let service = SpanAlignment {
        depth: 1,
        start_time: 1_700_000_000_010,
        elapsed: 90,
        gap: 10,
        agent_id: "agent-1".to_string(),
        application_id: "shop".to_string(),
        transaction_id: "shop^1700000000000^1".to_string(),
        span_id: SpanId(1001),
        execution_ms: 30,
        annotations: vec![api_annotation(
            "com.example.OrderService.place(Order order)",
            None,
            ApiType::DEFAULT,
        )],
        exception: Some(SpanException {
            class_name: "com.example.StockException".to_string(),
            message: "out of stock".to_string(),
        }),
        ..SpanAlignment::default()
    };
    let service_node = tree.add_child(tree.root(), service);

    let query = SpanAlignment {
        depth: 2,
        start_time: 1_700_000_000_030,
        elapsed: 60,
        gap: 20,
        agent_id: "agent-1".to_string(),
        application_id: "shop".to_string(),
        service_type: ServiceTypeCode(2101),
        destination_id: "db-primary".to_string(),
        transaction_id: "shop^1700000000000^1".to_string(),
        span_id: SpanId(1002),
        execution_ms: 60,
        annotations: vec![
            // pre-formatted by the MySQL instrumentation, no parsing
            api_annotation("MySQL SELECT", None, ApiType(2051)),
            Annotation {
                key: AnnotationKeyCode(14),
                value: AnnotationValue::Text("SELECT stock FROM items WHERE id=?".to_string()),
                authorized: true,
            },
        ],
        ..SpanAlignment::default()
    };
    tree.add_child(service_node, query);
    tree
}

#[test]
fn test_full_trace_flattens_in_display_order() {
    let (service_types, keys) = registries();
    let tree = sample_tree();
    let mut builder = RecordBuilder::new(&service_types, &keys, &SignatureParser);

    let records = flatten(&tree, &mut builder, |_| String::new()).unwrap();

    // root span, service span, its exception, query span, its SQL annotation
    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "submit(Order order)",
            "place(Order order)",
            "StockException",
            "MySQL SELECT",
            "SQL",
        ]
    );
}

#[test]
fn test_span_rows_get_ids_one_to_n() {
    let (service_types, keys) = registries();
    let tree = sample_tree();
    let mut builder = RecordBuilder::new(&service_types, &keys, &SignatureParser);

    let records = flatten(&tree, &mut builder, |_| String::new()).unwrap();

    let mut span_ids: Vec<u32> =
        records.iter().filter(|r| r.is_method()).map(|r| r.id.get()).collect();
    span_ids.sort_unstable();
    assert_eq!(span_ids.len(), tree.len());
    // span rows took ids 1, 2 and 4; the exception row consumed 3
    assert_eq!(span_ids, vec![1, 2, 4]);

    let all_ids: Vec<u32> = records.iter().map(|r| r.id.get()).collect();
    assert_eq!(all_ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_api_resolution_variants_across_one_trace() {
    let (service_types, keys) = registries();
    let tree = sample_tree();
    let mut builder = RecordBuilder::new(&service_types, &keys, &SignatureParser);

    let records = flatten(&tree, &mut builder, |_| String::new()).unwrap();

    let root_detail = records[0].span_detail().unwrap();
    assert_eq!(root_detail.simple_class_name, "CheckoutController");
    assert_eq!(
        root_detail.full_api_description,
        "com.example.CheckoutController.submit(Order order):42"
    );
    assert_eq!(root_detail.service_type.name, "TOMCAT");

    let query_detail = records[3].span_detail().unwrap();
    assert_eq!(query_detail.api_type, ApiType(2051));
    assert_eq!(query_detail.simple_class_name, "");
    assert_eq!(query_detail.service_type.name, "MYSQL");
    assert_eq!(query_detail.destination_id, "db-primary");
}

#[test]
fn test_span_without_metadata_uses_registry_error_name() {
    let (service_types, keys) = registries();
    let root = SpanAlignment {
        is_span: true,
        annotations: vec![Annotation {
            key: AnnotationKeyCode(10_000_000),
            value: AnnotationValue::Long(0),
            authorized: true,
        }],
        ..SpanAlignment::default()
    };
    let tree = CallTree::new(root);
    let mut builder = RecordBuilder::new(&service_types, &keys, &SignatureParser);

    let records = flatten(&tree, &mut builder, |_| String::new()).unwrap();
    assert_eq!(records[0].title, "API-METADATA-NOT-FOUND");
}

#[test]
fn test_parameter_rows_attach_to_span_rows() {
    let (service_types, keys) = registries();
    let tree = sample_tree();
    let mut builder = RecordBuilder::new(&service_types, &keys, &SignatureParser);

    let mut records = flatten(&tree, &mut builder, |_| String::new()).unwrap();
    let root_row_id = records[0].id;
    let root_depth = records[0].depth;
    records.push(builder.parameter_record(root_depth + 1, root_row_id, "orderId", "8412"));

    let parameter = records.last().unwrap();
    assert_eq!(parameter.parent_id, Some(root_row_id));
    assert_eq!(parameter.id.get(), 6);
    assert!(parameter.authorized);
}

#[test]
fn test_serialized_rows_keep_wire_conventions() {
    let (service_types, keys) = registries();
    let tree = sample_tree();
    let mut builder = RecordBuilder::new(&service_types, &keys, &SignatureParser);

    let records = flatten(&tree, &mut builder, |_| String::new()).unwrap();
    let json = serde_json::to_value(&records).unwrap();

    // root row: parent 0, span payload inline
    assert_eq!(json[0]["parentId"], 0);
    assert_eq!(json[0]["type"], "span");
    assert_eq!(json[0]["serviceType"]["name"], "TOMCAT");
    assert_eq!(json[0]["hasChild"], true);

    // child rows point at real ids
    assert_eq!(json[1]["parentId"], json[0]["id"]);
    assert_eq!(json[2]["type"], "exception");

    // non-span rows carry no span payload
    assert!(json[4].get("serviceType").is_none());
    assert_eq!(json[4]["type"], "annotation");
}
