//! The immutable registry of reflected methods, basic types and makers.

use std::sync::Arc;

use serde::Serialize;

use crate::basic::{BasicType, BasicTypeRegistry};
use crate::config::ExporterOptions;
use crate::contract::{self, HandlerSignature};
use crate::error::Result;
use crate::field::Method;
use crate::makers::{ts_scalar, File, Maker, MakerRegistry};
use crate::reflect::Reflector;
use crate::ApiRoute;

/// A route waiting to be validated and reflected.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub name: String,
    pub method: String,
    pub path: String,
    pub description: String,
    pub signature: HandlerSignature,
}

impl RouteSpec {
    pub fn new(
        name: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        signature: HandlerSignature,
    ) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            path: path.into(),
            description: String::new(),
            signature,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl From<&ApiRoute> for RouteSpec {
    fn from(route: &ApiRoute) -> Self {
        RouteSpec::new(route.operation_id, route.method, route.path, (route.signature)())
            .description(route.description)
    }
}

pub struct ExporterBuilder {
    version: String,
    options: ExporterOptions,
    basics: BasicTypeRegistry,
    makers: MakerRegistry,
    routes: Vec<RouteSpec>,
}

impl Default for ExporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterBuilder {
    /// Starts with the default basic types and makers.
    pub fn new() -> Self {
        Self {
            version: String::new(),
            options: ExporterOptions::default(),
            basics: BasicTypeRegistry::with_defaults(),
            makers: MakerRegistry::with_defaults(),
            routes: Vec::new(),
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn options(mut self, options: ExporterOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers a basic type on top of the defaults. Re-registering a type replaces it.
    pub fn basic_type(mut self, basic: BasicType) -> Self {
        self.basics.register(basic);
        self
    }

    /// Registers a maker, replacing any built-in one with the same target name.
    pub fn maker(mut self, target: impl Into<String>, maker: Arc<dyn Maker>) -> Self {
        self.makers.insert(target, maker);
        self
    }

    pub fn route(mut self, route: RouteSpec) -> Self {
        self.routes.push(route);
        self
    }

    /// Adds every handler registered with `#[api]`, ordered by path then method.
    pub fn discover(mut self) -> Self {
        let mut routes: Vec<&ApiRoute> = inventory::iter::<ApiRoute>.into_iter().collect();
        routes.sort_by(|a, b| (a.path, a.method).cmp(&(b.path, b.method)));
        self.routes.extend(routes.into_iter().map(RouteSpec::from));
        self
    }

    /// Validates and reflects every route. A handler with an unsupported shape fails the build.
    pub fn build(self) -> Result<Exporter> {
        let mut methods = Vec::with_capacity(self.routes.len());
        for route in self.routes {
            let shape = contract::validate(&route.signature)?;
            let mut reflector = Reflector::new(&self.basics);
            let input = shape
                .input()
                .map(|desc| reflector.reflect("input", "", "", None, desc.clone()));
            let output = shape
                .output()
                .map(|desc| reflector.reflect("output", "", "", None, desc.clone()));
            let method = if route.method.is_empty() {
                "POST".to_string()
            } else {
                route.method.to_uppercase()
            };
            tracing::info!("registered {} {} -> {}", method, route.path, route.name);
            methods.push(Method {
                name: route.name,
                method,
                path: route.path,
                description: route.description,
                input,
                output,
            });
        }
        Ok(Exporter {
            version: self.version,
            options: self.options,
            basics: self.basics,
            makers: self.makers,
            methods,
        })
    }
}

/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct Exporter {
    version: String,
    options: ExporterOptions,
    basics: BasicTypeRegistry,
    makers: MakerRegistry,
    methods: Vec<Method>,
}

/// Everything the exporter knows, as served on `/protocol`.
#[derive(Debug, Clone, Serialize)]
pub struct Protocol {
    pub version: String,
    pub options: ExporterOptions,
    pub methods: Vec<Method>,
    pub basics: Vec<BasicType>,
}

impl Exporter {
    pub fn builder() -> ExporterBuilder {
        ExporterBuilder::new()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn options(&self) -> &ExporterOptions {
        &self.options
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.makers.targets()
    }

    /// Generates the SDK files for `target`. Works on a private copy of the methods.
    pub fn generate(&self, target: &str, package: &str) -> Result<Vec<File>> {
        let maker = self.makers.get(target)?;
        tracing::debug!("generating '{}' sdk for {} methods", target, self.methods.len());
        maker.make(package, self.methods.clone())
    }

    pub fn generate_json(&self, target: &str, package: &str) -> Result<String> {
        Ok(serde_json::to_string(&self.generate(target, package)?)?)
    }

    /// With `lang == "ts"` every field keeps its neutral type in `origin` and gets its
    /// TypeScript type in `type`.
    pub fn protocol(&self, lang: &str) -> Protocol {
        let mut methods = self.methods.clone();
        if lang == "ts" {
            for io in methods
                .iter_mut()
                .flat_map(|m| [m.input.as_mut(), m.output.as_mut()])
                .flatten()
            {
                io.walk_mut(&mut |field| {
                    if field.is_self_ref() {
                        return;
                    }
                    let ts = match field.basic_type.as_ref().and_then(|b| b.library("ts")) {
                        Some(library) => library.type_name.clone(),
                        None => ts_scalar(&field.type_name),
                    };
                    field.origin = std::mem::replace(&mut field.type_name, ts);
                });
            }
        }
        Protocol {
            version: self.version.clone(),
            options: self.options.clone(),
            methods,
            basics: self.basics.all().iter().map(|b| b.as_ref().clone()).collect(),
        }
    }
}
