//! Per-tab content: documentation view plus the debug form and its response

use crate::error::BodyFormatError;
use crate::models::{ExecutionResult, GlobalParam};
use crate::spec::schema::pretty_json;
use crate::spec::{Operation, OperationDoc, SchemaResolver};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelView {
    #[default]
    Document,
    Debug,
}

impl PanelView {
    pub fn toggle(&self) -> PanelView {
        match self {
            PanelView::Document => PanelView::Debug,
            PanelView::Debug => PanelView::Document,
        }
    }
}

/// Which part of an execution result is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponsePane {
    #[default]
    Body,
    Headers,
    Curl,
}

impl ResponsePane {
    pub fn next(&self) -> ResponsePane {
        match self {
            ResponsePane::Body => ResponsePane::Headers,
            ResponsePane::Headers => ResponsePane::Curl,
            ResponsePane::Curl => ResponsePane::Body,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ResponsePane::Body => "Body",
            ResponsePane::Headers => "Headers",
            ResponsePane::Curl => "cURL",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ResponseState {
    #[default]
    Hidden,
    Pending { request_id: u64 },
    Ready(ExecutionResult),
}

/// One editable input of the debug form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugField {
    Global(usize),
    Param(usize),
    Body,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TabPanel {
    pub doc: OperationDoc,
    pub view: PanelView,
    /// Live global parameter inputs, seeded from the stored set
    pub globals: Vec<GlobalParam>,
    /// Parameter inputs, index-aligned with `doc.parameters`
    pub values: Vec<String>,
    pub body: String,
    pub field: usize,
    pub response: ResponseState,
    pub pane: ResponsePane,
    pub scroll: u16,
}

impl TabPanel {
    pub fn new(operation: &Operation, resolver: &SchemaResolver<'_>, globals: &[GlobalParam]) -> Self {
        let doc = OperationDoc::build(operation, resolver);
        let values = doc
            .parameters
            .iter()
            .map(|p| p.default.clone().unwrap_or_default())
            .collect();
        let body = doc
            .request_body
            .as_ref()
            .map(|b| b.example.clone())
            .unwrap_or_default();
        TabPanel {
            doc,
            view: PanelView::Document,
            globals: globals.to_vec(),
            values,
            body,
            field: 0,
            response: ResponseState::Hidden,
            pane: ResponsePane::Body,
            scroll: 0,
        }
    }

    pub fn has_body(&self) -> bool {
        self.doc.request_body.is_some()
    }

    fn example(&self) -> &str {
        self.doc
            .request_body
            .as_ref()
            .map(|b| b.example.as_str())
            .unwrap_or("")
    }

    /// Editable inputs in display order
    pub fn fields(&self) -> Vec<DebugField> {
        let mut fields: Vec<DebugField> = (0..self.globals.len()).map(DebugField::Global).collect();
        fields.extend((0..self.values.len()).map(DebugField::Param));
        if self.has_body() {
            fields.push(DebugField::Body);
        }
        fields
    }

    pub fn selected_field(&self) -> Option<DebugField> {
        self.fields().get(self.field).copied()
    }

    pub fn next_field(&mut self) {
        let count = self.fields().len();
        if count > 0 {
            self.field = (self.field + 1) % count;
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.fields().len();
        if count > 0 {
            self.field = self.field.checked_sub(1).unwrap_or(count - 1);
        }
    }

    pub fn field_value(&self, field: DebugField) -> Option<&str> {
        match field {
            DebugField::Global(i) => self.globals.get(i).map(|g| g.value.as_str()),
            DebugField::Param(i) => self.values.get(i).map(String::as_str),
            DebugField::Body => Some(&self.body),
        }
    }

    pub fn field_mut(&mut self, field: DebugField) -> Option<&mut String> {
        match field {
            DebugField::Global(i) => self.globals.get_mut(i).map(|g| &mut g.value),
            DebugField::Param(i) => self.values.get_mut(i),
            DebugField::Body => Some(&mut self.body),
        }
    }

    /// Clear parameter inputs, restore the example body and hide the response
    pub fn reset(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
        self.body = self.example().to_string();
        self.response = ResponseState::Hidden;
        self.scroll = 0;
    }

    /// Pretty-print the body editor; invalid JSON leaves it untouched
    pub fn format_body(&mut self) -> Result<(), BodyFormatError> {
        let value: serde_json::Value = serde_json::from_str(&self.body)?;
        self.body = pretty_json(&value);
        Ok(())
    }

    pub fn begin_request(&mut self, request_id: u64) {
        self.response = ResponseState::Pending { request_id };
        self.scroll = 0;
    }

    /// Apply a result if this panel is still waiting for that request
    pub fn finish_request(&mut self, request_id: u64, result: ExecutionResult) -> bool {
        match self.response {
            ResponseState::Pending { request_id: pending } if pending == request_id => {
                self.response = ResponseState::Ready(result);
                true
            }
            _ => false,
        }
    }

    pub fn result(&self) -> Option<&ExecutionResult> {
        match &self.response {
            ResponseState::Ready(result) => Some(result),
            _ => None,
        }
    }
}
