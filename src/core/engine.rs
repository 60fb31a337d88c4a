use crate::core::Tool;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ToolEngine<T: Tool> {
    tool: T,
}

impl<T: Tool> ToolEngine<T> {
    pub fn new(tool: T) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    pub async fn run(&self) -> Result<Vec<String>> {
        let started = Instant::now();
        let name = self.tool.name();
        tracing::info!("🚀 Starting {}", name);

        tracing::debug!("{}: gathering input", name);
        let input = self.tool.gather().await?;

        tracing::debug!("{}: transforming", name);
        let output = self.tool.transform(input).await?;

        tracing::debug!("{}: exporting", name);
        let written = self.tool.export(output).await?;

        tracing::info!(
            "✅ {} finished in {:?}, {} file(s) written",
            name,
            started.elapsed(),
            written.len()
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ZaloError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        phases: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    #[async_trait]
    impl Tool for Recorder {
        type Input = u32;
        type Output = String;

        fn name(&self) -> &'static str {
            "recorder"
        }

        async fn gather(&self) -> Result<u32> {
            self.phases.lock().unwrap().push("gather");
            Ok(7)
        }

        async fn transform(&self, input: u32) -> Result<String> {
            self.phases.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(ZaloError::ProcessingError {
                    message: "boom".to_string(),
                });
            }
            Ok(format!("out-{}", input))
        }

        async fn export(&self, output: String) -> Result<Vec<String>> {
            self.phases.lock().unwrap().push("export");
            Ok(vec![output])
        }
    }

    #[tokio::test]
    async fn test_phases_run_in_order() {
        let engine = ToolEngine::new(Recorder {
            phases: Mutex::new(Vec::new()),
            fail_transform: false,
        });

        let written = engine.run().await.unwrap();
        assert_eq!(written, vec!["out-7".to_string()]);
        assert_eq!(
            *engine.tool().phases.lock().unwrap(),
            vec!["gather", "transform", "export"]
        );
    }

    #[tokio::test]
    async fn test_failure_stops_before_export() {
        let engine = ToolEngine::new(Recorder {
            phases: Mutex::new(Vec::new()),
            fail_transform: true,
        });

        assert!(engine.run().await.is_err());
        assert_eq!(
            *engine.tool().phases.lock().unwrap(),
            vec!["gather", "transform"]
        );
    }
}
