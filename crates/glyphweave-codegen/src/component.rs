//! Descriptor → React component source
//!
//! Every icon variant is emitted in two forms:
//!
//! - **flat**: just the component definition, concatenated into a bucket
//!   file that already has the imports and the shared warning store in scope
//! - **entrypoint**: a standalone module with its own imports, an isolated
//!   warning flag and a default export

use glyphweave_core::{Attributes, Descriptor, DrawingNode};

use crate::attributes::AttributeCodegen;
use crate::files::{BASE_COMPONENT_PATH, relative_specifier};

/// Identifier of the deprecation warning state in generated code
pub const WARN_STATE: &str = "didWarnAboutDeprecation";

/// Scope of the once-per-process deprecation warning guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningGuard {
    /// Keyed store declared once by the enclosing bucket file
    Shared,
    /// Private boolean declared by the module itself
    Isolated,
}

impl WarningGuard {
    /// Expression reading (and assigning) the guard for one component
    fn slot(self, module_name: &str) -> String {
        match self {
            WarningGuard::Shared => format!("{}['{}']", WARN_STATE, module_name),
            WarningGuard::Isolated => WARN_STATE.to_string(),
        }
    }

    /// Declaration introducing the guard state
    pub fn declaration(self) -> String {
        match self {
            WarningGuard::Shared => format!("const {} = {{}};", WARN_STATE),
            WarningGuard::Isolated => format!("let {} = false;", WARN_STATE),
        }
    }
}

/// Generates component source for a single icon variant
#[derive(Debug, Clone)]
pub struct ComponentCodegen<'a> {
    banner: &'a str,
    package: &'a str,
}

impl<'a> ComponentCodegen<'a> {
    /// Create a generator stamping `banner` on entrypoints and naming
    /// `package` in deprecation warnings
    pub fn new(banner: &'a str, package: &'a str) -> Self {
        Self { banner, package }
    }

    /// Component definition without imports or exports
    pub fn flat_export(&self, module_name: &str, descriptor: &Descriptor, deprecated: bool) -> String {
        let guard = deprecated.then_some(WarningGuard::Shared);
        self.component(module_name, descriptor, guard)
    }

    /// Standalone module exporting the component as its default export
    ///
    /// `filepath` is the module's own location, used to resolve the import
    /// of the base `Icon` component.
    pub fn entrypoint(
        &self,
        module_name: &str,
        filepath: &str,
        descriptor: &Descriptor,
        deprecated: bool,
    ) -> String {
        let guard = deprecated.then_some(WarningGuard::Isolated);

        let mut code = String::new();
        code.push_str(self.banner);
        code.push('\n');
        code.push_str("import React from 'react';\n");
        code.push_str(&format!(
            "import Icon from '{}';\n",
            relative_specifier(filepath, BASE_COMPONENT_PATH)
        ));
        if let Some(guard) = guard {
            code.push_str(&guard.declaration());
            code.push('\n');
        }
        code.push('\n');
        code.push_str(&self.component(module_name, descriptor, guard));
        code.push_str(&format!("export default {};\n", module_name));
        code
    }

    fn component(&self, module_name: &str, descriptor: &Descriptor, guard: Option<WarningGuard>) -> String {
        let missing = descriptor.missing_dimensions();
        if !missing.is_empty() {
            tracing::warn!(
                "{} is missing descriptor attributes: {}",
                module_name,
                missing.join(", ")
            );
        }

        let dimension = |name: &str| {
            descriptor
                .attrs
                .get(name)
                .map(ToString::to_string)
                .unwrap_or_default()
        };

        let mut code = format!(
            "const {name} = /*#__PURE__*/ React.forwardRef(function {name}({{ children, ...rest }}, ref) {{\n",
            name = module_name,
        );

        if let Some(guard) = guard {
            code.push_str(&self.deprecation_block(module_name, guard));
        }

        code.push_str("  return (\n");
        code.push_str("    <Icon\n");
        code.push_str(&format!("      width={{{}}}\n", dimension("width")));
        code.push_str(&format!("      height={{{}}}\n", dimension("height")));
        code.push_str(&format!("      viewBox=\"{}\"\n", dimension("viewBox")));

        let passthrough = Self::passthrough_attrs(&descriptor.attrs);
        if !passthrough.is_empty() {
            code.push_str(&format!("      {}\n", AttributeCodegen::format(&passthrough)));
        }

        code.push_str("      ref={ref}\n");
        code.push_str("      {...rest}>\n");
        for node in &descriptor.content {
            code.push_str(&format!("      {}\n", Self::node(node)));
        }
        code.push_str("      {children}\n");
        code.push_str("    </Icon>\n");
        code.push_str("  );\n");
        code.push_str("});\n");
        code
    }

    fn deprecation_block(&self, module_name: &str, guard: WarningGuard) -> String {
        let slot = guard.slot(module_name);
        format!(
            r#"  if (__DEV__) {{
    if (!{slot}) {{
      {slot} = true;
      console.warn(
        `The {name} component has been deprecated and will be ` +
          `removed in the next major version of {package}.`
      );
    }}
  }}
"#,
            slot = slot,
            name = module_name,
            package = self.package,
        )
    }

    /// Self-closing JSX element for a drawing primitive
    pub fn node(node: &DrawingNode) -> String {
        if node.attrs.is_empty() {
            format!("<{} />", node.elem)
        } else {
            format!("<{} {} />", node.elem, AttributeCodegen::format(&node.attrs))
        }
    }

    fn passthrough_attrs(attrs: &Attributes) -> Attributes {
        attrs
            .iter()
            .filter(|(key, _)| !Descriptor::DIMENSION_ATTRS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
