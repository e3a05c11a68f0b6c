// Application layer: load, filter, lay out, draw, show.

use crate::domain::callgraph::FileCallGraph;
use crate::domain::drawing::Drawing;
use crate::domain::layout::SpringLayout;
use crate::domain::style::{title_for, Canvas, Palette};
use crate::ports::{DocumentSource, DrawingExporter, Viewer};
use anyhow::Result;
use std::path::PathBuf;

/// What to draw and where. Without `output` nothing is written.
#[derive(Debug, Clone)]
pub struct VisualizeRequest {
    pub target_file: String,
    pub layout: SpringLayout,
    pub canvas: Canvas,
    pub palette: Palette,
    pub output: Option<PathBuf>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizeReport {
    pub total_functions: usize,
    pub nodes: usize,
    pub edges: usize,
    pub dropped_calls: usize,
    pub output: Option<PathBuf>,
    pub shown: bool,
}

/// The main usecase: render one file's call graph, write it when asked and
/// show it.
pub struct VisualizeUsecase<'a> {
    pub source: &'a dyn DocumentSource,
    pub exporter: &'a dyn DrawingExporter,
    pub viewer: Option<&'a dyn Viewer>,
}

impl<'a> VisualizeUsecase<'a> {
    /// Load errors come back as `LoadError` inside the `anyhow::Error`.
    pub fn run(&self, request: &VisualizeRequest) -> Result<VisualizeReport> {
        let doc = self.source.load()?;
        let graph = FileCallGraph::from_document(&doc, &request.target_file);
        if graph.node_count() == 0 {
            tracing::warn!(file = %request.target_file, "no functions found for file");
        }

        let layout = request.layout.compute(&graph.graph);
        let drawing = Drawing {
            graph: &graph,
            layout: &layout,
            palette: &request.palette,
            canvas: &request.canvas,
            title: title_for(&request.target_file),
        };
        if let Some(output) = &request.output {
            self.exporter.export(&drawing, output)?;
            tracing::info!(output = %output.display(), "drawing written");
        }

        // With a written file, a viewer failure only downgrades `shown`.
        let shown = match self.viewer {
            Some(viewer) => match viewer.show(&drawing) {
                Ok(()) => true,
                Err(e) if request.output.is_some() => {
                    tracing::warn!(error = %format!("{:#}", e), "could not show the drawing");
                    false
                }
                Err(e) => return Err(e.context("Nothing was drawn")),
            },
            None => {
                if request.output.is_none() {
                    tracing::warn!("no window and no output file; only the summary is produced");
                }
                false
            }
        };

        Ok(VisualizeReport {
            total_functions: doc.functions.len(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            dropped_calls: graph.dropped_calls(),
            output: request.output.clone(),
            shown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::CallGraphDocument;
    use crate::domain::error::LoadError;
    use std::cell::RefCell;
    use std::path::Path;

    struct InlineSource(&'static str);
    impl DocumentSource for InlineSource {
        fn load(&self) -> Result<CallGraphDocument, LoadError> {
            serde_json::from_str(self.0).map_err(|e| LoadError::from_json(PathBuf::from("inline"), e))
        }
    }

    struct MissingSource;
    impl DocumentSource for MissingSource {
        fn load(&self) -> Result<CallGraphDocument, LoadError> {
            Err(LoadError::NotFound {
                path: PathBuf::from("call_graph.json"),
            })
        }
    }

    #[derive(Default)]
    struct RecordingExporter {
        seen: RefCell<Vec<(usize, String)>>,
    }
    impl DrawingExporter for RecordingExporter {
        fn export(&self, drawing: &Drawing, _path: &Path) -> Result<()> {
            self.seen
                .borrow_mut()
                .push((drawing.placed_nodes().len(), drawing.title.clone()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingViewer {
        shown: RefCell<Vec<String>>,
    }
    impl Viewer for RecordingViewer {
        fn show(&self, drawing: &Drawing) -> Result<()> {
            self.shown.borrow_mut().push(drawing.title.clone());
            Ok(())
        }
    }

    fn request() -> VisualizeRequest {
        VisualizeRequest {
            target_file: "ingestion.py".to_string(),
            layout: SpringLayout::default(),
            canvas: Canvas::default(),
            palette: Palette::for_target("ingestion.py"),
            output: Some(PathBuf::from("out.svg")),
        }
    }

    #[test]
    fn test_run_draws_and_shows() {
        let source = InlineSource(
            r#"{"functions": {
                "a": {"file": "ingestion.py", "calls": ["b", "ext"]},
                "b": {"file": "ingestion.py", "calls": []},
                "c": {"file": "other.py", "calls": ["a"]}
            }}"#,
        );
        let exporter = RecordingExporter::default();
        let viewer = RecordingViewer::default();
        let usecase = VisualizeUsecase {
            source: &source,
            exporter: &exporter,
            viewer: Some(&viewer),
        };

        let report = usecase.run(&request()).unwrap();
        assert_eq!(report.total_functions, 3);
        assert_eq!(report.nodes, 2);
        assert_eq!(report.edges, 1);
        assert_eq!(report.dropped_calls, 1);
        assert!(report.shown);
        assert_eq!(
            exporter.seen.borrow().as_slice(),
            &[(2, "Call Graph for Functions in ingestion.py".to_string())]
        );
        assert_eq!(
            viewer.shown.borrow().as_slice(),
            &["Call Graph for Functions in ingestion.py".to_string()]
        );
        assert_eq!(report.output, Some(PathBuf::from("out.svg")));
    }

    #[test]
    fn test_window_only_run_writes_nothing() {
        let source = InlineSource(r#"{"functions": {"a": {"file": "ingestion.py", "calls": ["a"]}}}"#);
        let exporter = RecordingExporter::default();
        let viewer = RecordingViewer::default();
        let usecase = VisualizeUsecase {
            source: &source,
            exporter: &exporter,
            viewer: Some(&viewer),
        };
        let request = VisualizeRequest {
            output: None,
            ..request()
        };

        let report = usecase.run(&request).unwrap();
        assert!(report.shown);
        assert_eq!(report.output, None);
        assert!(exporter.seen.borrow().is_empty());
        assert_eq!(viewer.shown.borrow().len(), 1);
    }

    struct BrokenViewer;
    impl Viewer for BrokenViewer {
        fn show(&self, _drawing: &Drawing) -> Result<()> {
            anyhow::bail!("no display")
        }
    }

    #[test]
    fn test_viewer_failure_without_output_is_an_error() {
        let source = InlineSource(r#"{"functions": {"a": {"file": "ingestion.py", "calls": []}}}"#);
        let exporter = RecordingExporter::default();
        let usecase = VisualizeUsecase {
            source: &source,
            exporter: &exporter,
            viewer: Some(&BrokenViewer),
        };
        let request = VisualizeRequest {
            output: None,
            ..request()
        };

        let err = usecase.run(&request).unwrap_err();
        assert!(format!("{:#}", err).contains("no display"));
        assert!(exporter.seen.borrow().is_empty());
    }

    #[test]
    fn test_viewer_failure_after_export_is_not_fatal() {
        let source = InlineSource(r#"{"functions": {"a": {"file": "ingestion.py", "calls": []}}}"#);
        let exporter = RecordingExporter::default();
        let usecase = VisualizeUsecase {
            source: &source,
            exporter: &exporter,
            viewer: Some(&BrokenViewer),
        };

        let report = usecase.run(&request()).unwrap();
        assert!(!report.shown);
        assert_eq!(report.nodes, 1);
        assert_eq!(report.edges, 0);
    }

    #[test]
    fn test_load_failure_skips_drawing_and_viewer() {
        let exporter = RecordingExporter::default();
        let viewer = RecordingViewer::default();
        let usecase = VisualizeUsecase {
            source: &MissingSource,
            exporter: &exporter,
            viewer: Some(&viewer),
        };

        let err = usecase.run(&request()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::NotFound { .. })
        ));
        assert!(exporter.seen.borrow().is_empty());
        assert!(viewer.shown.borrow().is_empty());
    }
}
