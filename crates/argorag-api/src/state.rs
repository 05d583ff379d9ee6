use argorag_ingest::DepthSeriesStore;
use argorag_llm::OllamaGenerator;
use argorag_retrieval::{HybridRetriever, QueryTranslator};

pub struct AppState {
    pub translator: QueryTranslator<OllamaGenerator>,
    pub retriever: HybridRetriever,
    pub depth_store: DepthSeriesStore,
}

impl AppState {
    pub fn new(
        translator: QueryTranslator<OllamaGenerator>,
        retriever: HybridRetriever,
        depth_store: DepthSeriesStore,
    ) -> Self {
        Self {
            translator,
            retriever,
            depth_store,
        }
    }
}
