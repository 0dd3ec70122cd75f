use crate::config::{DatasetManifest, ParserConfig};
use crate::sampling::capacity::estimate_capacity;
use crate::sampling::index_table::{IndexTable, SampleIndex};
use crate::sampling::sample::Sample;
use crate::sampling::sample_generator::SampleGenerator;
use crate::sampling::slice::SampleSlice;
use crate::shared::color_format::ColorFormat;
use crate::shared::error::DatasetError;
use crate::source::domain::frame_source::FrameSource;
use crate::source::infrastructure::image_sequence_source::ImageSequenceSource;
use crate::source::infrastructure::padded_source::PaddedSource;

/// Fixed-length, randomly and slice-indexable sequence of training samples
/// drawn from a collection of frame sources.
///
/// Sources, depth and the index table are fixed at construction. Samples
/// are generated on demand; a `&Parser` can be shared between threads.
pub struct Parser {
    sources: Vec<Box<dyn FrameSource>>,
    config: ParserConfig,
    generator: SampleGenerator,
    index: IndexTable,
}

impl Parser {
    pub fn new(sources: Vec<Box<dyn FrameSource>>, config: ParserConfig) -> Self {
        let window = config.window();
        let sources = if config.method.pads_edges() && config.depth > 1 {
            if config.depth % 2 == 0 {
                log::warn!(
                    "Even depth {} cannot center windows; padding {} frames at each end",
                    config.depth,
                    window.edge_padding()
                );
            }
            let pad = window.edge_padding();
            sources
                .into_iter()
                .map(|s| Box::new(PaddedSource::new(s, pad, pad)) as Box<dyn FrameSource>)
                .collect()
        } else {
            sources
        };

        let frame_counts: Vec<usize> = sources.iter().map(|s| s.frame_count()).collect();
        let index = IndexTable::build(&frame_counts, window);
        log::info!(
            "Indexed {} samples from {} sources ({} mode, depth {})",
            index.len(),
            sources.len(),
            config.method,
            config.depth
        );

        Self {
            generator: SampleGenerator::from_config(&config),
            sources,
            config,
            index,
        }
    }

    /// Opens the manifest's sources for `config.method` as image sequences.
    pub fn from_manifest(manifest: &DatasetManifest, config: ParserConfig) -> Result<Self, DatasetError> {
        let sources = manifest
            .sources(config.method)
            .iter()
            .map(|path| {
                ImageSequenceSource::open(path).map(|s| Box::new(s) as Box<dyn FrameSource>)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(sources, config))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Generates sample `index` as a one-element list.
    pub fn get(&self, index: usize) -> Result<Vec<Sample>, DatasetError> {
        let location = self.index.resolve(index)?;
        self.generate(location)
    }

    /// Generates every sample selected by `slice`, in selection order.
    pub fn slice(&self, slice: impl Into<SampleSlice>) -> Result<Vec<Sample>, DatasetError> {
        let mut samples = Vec::new();
        for location in self.index.resolve_slice(&slice.into())? {
            samples.extend(self.generate(location)?);
        }
        Ok(samples)
    }

    /// Iterates all samples in index order.
    pub fn iter(&self) -> impl Iterator<Item = Result<Sample, DatasetError>> + '_ {
        self.index
            .entries()
            .iter()
            .flat_map(move |&location| match self.generate(location) {
                Ok(samples) => samples.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            })
    }

    /// Advisory byte-size estimate of the fully materialized dataset.
    pub fn capacity(&self) -> u64 {
        estimate_capacity(
            self.sources.iter().map(|s| s.metadata()),
            self.config.scale,
            self.config.depth,
        )
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn color_format(&self) -> ColorFormat {
        self.config.color_format
    }

    /// Sources as indexed, including any inference padding.
    pub fn sources(&self) -> &[Box<dyn FrameSource>] {
        &self.sources
    }

    pub fn index_table(&self) -> &IndexTable {
        &self.index
    }

    pub fn samples_per_source(&self) -> &[usize] {
        self.index.samples_per_source()
    }

    fn generate(&self, location: SampleIndex) -> Result<Vec<Sample>, DatasetError> {
        let source = self.sources[location.source].as_ref();
        self.generator.generate(source, location.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Method, Scale};
    use crate::sampling::sample::SampleMetadata;
    use crate::shared::frame::Frame;
    use crate::source::infrastructure::in_memory_source::InMemorySource;
    use std::path::PathBuf;

    /// Source whose frames are 8x8 RGB filled with their frame number.
    fn numbered(name: &str, frames: u8) -> Box<dyn FrameSource> {
        let frames = (0..frames)
            .map(|v| Frame::filled(8, 8, ColorFormat::Rgb, &[v, v, v], 0))
            .collect();
        Box::new(InMemorySource::new(name, frames).unwrap())
    }

    fn config(method: Method, depth: i32) -> ParserConfig {
        ParserConfig {
            method,
            depth,
            scale: Scale::uniform(2.0).unwrap(),
            ..ParserConfig::default()
        }
    }

    fn first_pixels(sample: &Sample) -> Vec<u8> {
        sample.hr.frames().iter().map(|f| f.data()[0]).collect()
    }

    #[test]
    fn test_len_sums_samples_per_source() {
        let parser = Parser::new(
            vec![numbered("a", 5), numbered("b", 2), numbered("c", 4)],
            config(Method::Train, 3),
        );
        assert_eq!(parser.samples_per_source(), &[3, 1, 2]);
        assert_eq!(parser.len(), 6);
        assert!(!parser.is_empty());
    }

    #[test]
    fn test_get_returns_window_and_metadata() {
        let parser = Parser::new(vec![numbered("a", 2), numbered("b", 5)], config(Method::Train, 3));
        let samples = parser.get(2).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(first_pixels(&samples[0]), vec![1, 2, 3]);
        assert_eq!(
            samples[0].metadata,
            SampleMetadata {
                source_name: "b".to_string(),
                offset: 1,
                source_frames: 5,
            }
        );
    }

    #[test]
    fn test_short_source_sample_is_short() {
        let parser = Parser::new(vec![numbered("a", 2)], config(Method::Train, 5));
        assert_eq!(parser.len(), 1);
        assert_eq!(parser.get(0).unwrap()[0].hr.depth(), 2);
    }

    #[test]
    fn test_whole_source_depth() {
        let parser = Parser::new(vec![numbered("a", 7), numbered("b", 3)], config(Method::Train, -1));
        assert_eq!(parser.len(), 2);
        assert_eq!(parser.get(0).unwrap()[0].hr.depth(), 7);
        assert_eq!(parser.get(1).unwrap()[0].hr.depth(), 3);
    }

    #[test]
    fn test_out_of_range_index() {
        let parser = Parser::new(vec![numbered("a", 3)], config(Method::Train, 1));
        assert!(matches!(
            parser.get(3),
            Err(DatasetError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_slice_equals_individual_gets() {
        let parser = Parser::new(vec![numbered("a", 4), numbered("b", 4)], config(Method::Train, 2));
        let batch = parser.slice(2..5).unwrap();
        let single: Vec<Sample> = (2..5).flat_map(|i| parser.get(i).unwrap()).collect();
        assert_eq!(batch, single);
    }

    #[test]
    fn test_slice_clamps_and_rejects_zero_step() {
        let parser = Parser::new(vec![numbered("a", 3)], config(Method::Train, 1));
        assert_eq!(parser.slice(1..100).unwrap().len(), 2);
        assert!(parser.slice(SampleSlice::new(Some(5), None, None)).unwrap().is_empty());
        assert!(matches!(
            parser.slice(SampleSlice::new(None, None, Some(0))),
            Err(DatasetError::ZeroSliceStep)
        ));
    }

    #[test]
    fn test_inference_pads_so_every_frame_is_centered() {
        let parser = Parser::new(vec![numbered("a", 5)], config(Method::Test, 3));
        assert_eq!(parser.len(), 5);
        let centers: Vec<u8> = (0..parser.len())
            .map(|i| first_pixels(&parser.get(i).unwrap()[0])[1])
            .collect();
        assert_eq!(centers, vec![0, 1, 2, 3, 4]);
        assert_eq!(first_pixels(&parser.get(0).unwrap()[0]), vec![0, 0, 1]);
        assert_eq!(first_pixels(&parser.get(4).unwrap()[0]), vec![3, 4, 4]);
        assert_eq!(parser.get(0).unwrap()[0].metadata.source_frames, 7);
    }

    #[test]
    fn test_infer_mode_pads_like_test() {
        let parser = Parser::new(vec![numbered("a", 4)], config(Method::Infer, 5));
        assert_eq!(parser.sources()[0].frame_count(), 8);
        assert_eq!(parser.len(), 4);
    }

    #[test]
    fn test_even_depth_pads_half_depth() {
        let parser = Parser::new(vec![numbered("a", 4)], config(Method::Test, 4));
        assert_eq!(parser.sources()[0].frame_count(), 8);
        assert_eq!(parser.len(), 5);
    }

    #[test]
    fn test_no_padding_outside_inference() {
        let train = Parser::new(vec![numbered("a", 5)], config(Method::Train, 3));
        assert_eq!(train.sources()[0].frame_count(), 5);
        let single = Parser::new(vec![numbered("a", 5)], config(Method::Test, 1));
        assert_eq!(single.sources()[0].frame_count(), 5);
        let whole = Parser::new(vec![numbered("a", 5)], config(Method::Test, -1));
        assert_eq!(whole.len(), 1);
        assert_eq!(whole.sources()[0].frame_count(), 5);
    }

    #[test]
    fn test_color_format_applied() {
        let parser = Parser::new(
            vec![numbered("a", 1)],
            ParserConfig {
                color_format: ColorFormat::resolve("unknown"),
                ..config(Method::Train, 1)
            },
        );
        assert_eq!(parser.color_format(), ColorFormat::Gray);
        assert_eq!(parser.get(0).unwrap()[0].lr.frames()[0].channels(), 1);
    }

    #[test]
    fn test_capacity_grows_with_sources() {
        let one = Parser::new(vec![numbered("a", 3)], config(Method::Train, 1));
        let two = Parser::new(vec![numbered("a", 3), numbered("b", 1)], config(Method::Train, 1));
        // 8x8 pixels * 3 frames * 3 * (1 + 1/2)
        assert_eq!(one.capacity(), 864);
        assert!(two.capacity() > one.capacity());
    }

    #[test]
    fn test_iter_visits_every_sample() {
        let parser = Parser::new(vec![numbered("a", 3), numbered("b", 2)], config(Method::Train, 2));
        let samples: Vec<Sample> = parser.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(samples.len(), parser.len());
        assert_eq!(samples[2].metadata.source_name, "b");
    }

    #[test]
    fn test_concurrent_reads_share_parser() {
        let parser = Parser::new(vec![numbered("a", 6)], config(Method::Train, 2));
        let parser = &parser;
        let results: Vec<Vec<Sample>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..parser.len())
                .map(|i| scope.spawn(move || parser.get(i).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for (i, samples) in results.iter().enumerate() {
            assert_eq!(samples[0].metadata.offset, i);
        }
    }

    #[test]
    fn test_empty_parser() {
        let parser = Parser::new(Vec::new(), config(Method::Train, 3));
        assert!(parser.is_empty());
        assert_eq!(parser.capacity(), 0);
        assert!(parser.get(0).is_err());
    }

    #[test]
    fn test_from_manifest_reads_method_split() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip");
        std::fs::create_dir(&clip).unwrap();
        for i in 0..4u8 {
            let img = image::RgbImage::from_pixel(12, 12, image::Rgb([i, i, i]));
            img.save(clip.join(format!("{i:04}.png"))).unwrap();
        }
        let still = dir.path().join("still.png");
        image::RgbImage::from_pixel(9, 9, image::Rgb([1, 2, 3]))
            .save(&still)
            .unwrap();

        let manifest = DatasetManifest::new()
            .with_split(Method::Train, vec![clip, still])
            .with_split(Method::Test, vec![PathBuf::from("/nonexistent")]);
        let parser = Parser::from_manifest(
            &manifest,
            ParserConfig {
                scale: Scale::uniform(3.0).unwrap(),
                depth: 3,
                ..ParserConfig::default()
            },
        )
        .unwrap();

        assert_eq!(parser.samples_per_source(), &[2, 1]);
        let sample = parser.get(2).unwrap().remove(0);
        assert_eq!(sample.metadata.source_name, "still");
        assert_eq!(sample.hr.frame_shape(), Some((9, 9)));
        assert_eq!(sample.lr.frame_shape(), Some((3, 3)));
        let window = parser.get(1).unwrap().remove(0);
        assert_eq!(first_pixels(&window), vec![1, 2, 3]);
    }

    #[test]
    fn test_from_manifest_propagates_open_errors() {
        let manifest =
            DatasetManifest::new().with_split(Method::Test, vec![PathBuf::from("/nonexistent")]);
        let result = Parser::from_manifest(&manifest, config(Method::Test, 1));
        assert!(result.is_err());
    }
}
