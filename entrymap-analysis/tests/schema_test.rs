//! Schema resolution: memoization, sharing, cycles, depth bounds,
//! validation constraints, records, and getter inference.

use std::sync::Arc;

use entrymap_analysis::{AnalysisEngine, AnalysisResult, SourceInput};
use entrymap_core::{AnalysisConfig, CancellationToken};

fn analyze(inputs: Vec<SourceInput>) -> AnalysisResult {
    AnalysisEngine::default()
        .analyze(&inputs, &CancellationToken::new())
        .expect("analysis should succeed")
}

const ORDER_CONTROLLER: &str = r#"
package com.shop.api;

import org.springframework.web.bind.annotation.*;

@RestController
@RequestMapping("/orders")
public class OrderController {

    @PostMapping("")
    public OrderDto create(@RequestBody OrderDto order) { return null; }

    @PutMapping("/{id}")
    public OrderDto update(@RequestBody OrderDto order) { return null; }
}
"#;

const ORDER_DTO: &str = r#"
package com.shop.dto;

import javax.validation.constraints.*;
import java.util.List;

public class OrderDto {
    @NotNull
    private String customerId;

    @Size(min = 1, max = 50)
    private List<LineItem> items;

    @DecimalMin(value = "0.01")
    private BigDecimal total;
}

class LineItem {
    @NotBlank
    private String sku;

    @Min(1)
    private int quantity;
}
"#;

/// A DTO referenced by several entry points is resolved once and shared
/// by reference.
#[test]
fn schemas_are_memoized_and_shared() {
    let result = analyze(vec![
        SourceInput::new("OrderController.java", ORDER_CONTROLLER),
        SourceInput::new("OrderDto.java", ORDER_DTO),
    ]);

    let keys: Vec<&str> = result
        .entry_points
        .iter()
        .filter_map(|ep| ep.request_schema.as_deref())
        .collect();
    assert_eq!(keys, ["com.shop.dto.OrderDto", "com.shop.dto.OrderDto"]);

    // One map entry, one allocation, shared by reference.
    let schema = &result.schemas["com.shop.dto.OrderDto"];
    let other = Arc::clone(schema);
    assert!(Arc::ptr_eq(schema, &other));
    assert_eq!(
        result
            .schemas
            .keys()
            .filter(|k| k.ends_with("OrderDto"))
            .count(),
        1
    );
}

#[test]
fn validation_constraints_are_captured() {
    let result = analyze(vec![
        SourceInput::new("OrderController.java", ORDER_CONTROLLER),
        SourceInput::new("OrderDto.java", ORDER_DTO),
    ]);
    let schema = &result.schemas["com.shop.dto.OrderDto"];

    let customer = schema.fields.iter().find(|f| f.name == "customerId").unwrap();
    assert!(customer.required);
    assert_eq!(customer.constraints, ["@NotNull"]);

    let items = schema.fields.iter().find(|f| f.name == "items").unwrap();
    assert!(!items.required);
    assert_eq!(items.type_name, "List<LineItem>");
    assert_eq!(items.constraints, ["@Size(min=1, max=50)"]);

    let total = schema.fields.iter().find(|f| f.name == "total").unwrap();
    assert_eq!(total.constraints, ["@DecimalMin(0.01)"]);
}

/// Collection element types are followed into the schema map.
#[test]
fn nested_collection_element_is_resolved() {
    let result = analyze(vec![
        SourceInput::new("OrderController.java", ORDER_CONTROLLER),
        SourceInput::new("OrderDto.java", ORDER_DTO),
    ]);
    let line_item = &result.schemas["com.shop.dto.LineItem"];
    let sku = line_item.fields.iter().find(|f| f.name == "sku").unwrap();
    assert!(sku.required);
    let quantity = line_item.fields.iter().find(|f| f.name == "quantity").unwrap();
    assert_eq!(quantity.constraints, ["@Min(1)"]);
}

/// A self-referential DTO resolves without unbounded recursion; the
/// cyclic field keeps its type name.
#[test]
fn cyclic_type_terminates() {
    let source = r#"
package com.acme.tree;

import org.springframework.web.bind.annotation.*;
import java.util.List;

@RestController
public class CategoryController {
    @PostMapping("/categories")
    public void create(@RequestBody Category category) {}
}

class Category {
    private String name;
    private Category parent;
    private List<Category> children;
}
"#;
    let result = analyze(vec![SourceInput::new("CategoryController.java", source)]);
    let schema = &result.schemas["com.acme.tree.Category"];
    let parent = schema.fields.iter().find(|f| f.name == "parent").unwrap();
    assert_eq!(parent.type_name, "Category");
    let children = schema.fields.iter().find(|f| f.name == "children").unwrap();
    assert_eq!(children.type_name, "List<Category>");
}

/// Mutually-referential DTOs also terminate, and both land in the map.
#[test]
fn mutual_cycle_terminates() {
    let source = r#"
package com.acme.graph;

import org.springframework.web.bind.annotation.*;

@RestController
public class GraphController {
    @PostMapping("/nodes")
    public void create(@RequestBody NodeA node) {}
}

class NodeA {
    private NodeB peer;
}

class NodeB {
    private NodeA back;
}
"#;
    let result = analyze(vec![SourceInput::new("GraphController.java", source)]);
    assert!(result.schemas.contains_key("com.acme.graph.NodeA"));
    assert!(result.schemas.contains_key("com.acme.graph.NodeB"));
}

/// The depth bound stops resolution of deeply nested chains; shallow
/// types are resolved, deeper ones are left as type names only.
#[test]
fn depth_bound_limits_nesting() {
    let source = r#"
package com.acme.deep;

import org.springframework.web.bind.annotation.*;

@RestController
public class DeepController {
    @PostMapping("/deep")
    public void create(@RequestBody Level0 payload) {}
}

class Level0 { private Level1 next; }
class Level1 { private Level2 next; }
class Level2 { private Level3 next; }
class Level3 { private String leaf; }
"#;
    let config = AnalysisConfig {
        max_schema_depth: 2,
        ..AnalysisConfig::default()
    };
    let result = AnalysisEngine::new(config)
        .analyze(
            &[SourceInput::new("DeepController.java", source)],
            &CancellationToken::new(),
        )
        .unwrap();

    assert!(result.schemas.contains_key("com.acme.deep.Level0"));
    assert!(result.schemas.contains_key("com.acme.deep.Level1"));
    assert!(!result.schemas.contains_key("com.acme.deep.Level2"));
    // The bounded field still names its type.
    let level1 = &result.schemas["com.acme.deep.Level1"];
    assert_eq!(level1.fields[0].type_name, "Level2");
}

/// Java records contribute their components as implicitly required fields.
#[test]
fn record_components_are_required() {
    let source = r#"
package com.acme.records;

import org.springframework.web.bind.annotation.*;

@RestController
public class TransferController {
    @PostMapping("/transfers")
    public void transfer(@RequestBody TransferRequest request) {}
}

record TransferRequest(String fromAccount, String toAccount, BigDecimal amount) {}
"#;
    let result = analyze(vec![SourceInput::new("TransferController.java", source)]);
    let schema = &result.schemas["com.acme.records.TransferRequest"];
    assert_eq!(schema.fields.len(), 3);
    assert!(schema.fields.iter().all(|f| f.required));
}

/// A DTO exposing state only through accessors falls back to getter
/// inference.
#[test]
fn getter_inference_fallback() {
    let source = r#"
package com.acme.legacy;

import org.springframework.web.bind.annotation.*;

@RestController
public class StatusController {
    @GetMapping("/status")
    public StatusView status() { return null; }
}

class StatusView {
    public String getMessage() { return ""; }
    public boolean isHealthy() { return true; }
}
"#;
    let result = analyze(vec![SourceInput::new("StatusController.java", source)]);
    let schema = &result.schemas["com.acme.legacy.StatusView"];
    let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["message", "healthy"]);
    assert!(schema.fields.iter().all(|f| !f.required));
}

/// Field initializers are captured as default values, quotes stripped.
#[test]
fn field_initializers_become_default_values() {
    let source = r#"
package com.acme.paging;

import org.springframework.web.bind.annotation.*;

@RestController
public class PageController {
    @PostMapping("/pages")
    public void configure(@RequestBody PageSettings settings) {}
}

class PageSettings {
    private int pageSize = 25;
    private String sort = "asc";
    private String filter;
}
"#;
    let result = analyze(vec![SourceInput::new("PageController.java", source)]);
    let schema = &result.schemas["com.acme.paging.PageSettings"];
    let page_size = schema.fields.iter().find(|f| f.name == "pageSize").unwrap();
    assert_eq!(page_size.default_value.as_deref(), Some("25"));
    let sort = schema.fields.iter().find(|f| f.name == "sort").unwrap();
    assert_eq!(sort.default_value.as_deref(), Some("asc"));
    let filter = schema.fields.iter().find(|f| f.name == "filter").unwrap();
    assert_eq!(filter.default_value, None);
}

/// Primitive and library types produce no schema entries.
#[test]
fn library_types_have_no_schema() {
    let source = r#"
package com.acme.plain;

import org.springframework.web.bind.annotation.*;

@RestController
public class PlainController {
    @GetMapping("/name")
    public String name() { return ""; }
}
"#;
    let result = analyze(vec![SourceInput::new("PlainController.java", source)]);
    assert!(result.schemas.is_empty());
    assert!(result.entry_points[0].response_schema.is_none());
}
