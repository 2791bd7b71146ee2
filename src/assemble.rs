//! Map Assembler Module
//!
//! すべてのレイヤーの地物を1つの[`MapDocument`]にまとめ、
//! 地図の中心と外接矩形を計算するモジュール。

use crate::api::{SheetKind, TileStyle};
use crate::layers::Feature;
use crate::types::{Bounds, LatLng};

/// 地物が1つもない場合の中心（赤道と本初子午線の交点）
pub const DEFAULT_CENTER: LatLng = LatLng { lat: 0.0, lon: 0.0 };

/// 描画オプション
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// 初期ズームレベル
    pub zoom: u8,
    /// 明示的な中心（`None`の場合は地物から計算）
    pub center: Option<LatLng>,
    /// ベースレイヤー（先頭が初期表示）
    pub tiles: Vec<TileStyle>,
    /// マーカーをクラスタリングするか
    pub cluster_markers: bool,
    /// 中心にグローマーカーを置くか
    pub center_glow: bool,
    /// 表示範囲を全地物に合わせるか
    pub fit_bounds: bool,
    /// ページタイトル
    pub title: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom: 10,
            center: None,
            tiles: TileStyle::DEFAULTS.to_vec(),
            cluster_markers: true,
            center_glow: true,
            fit_bounds: false,
            title: "xlsxmap".to_string(),
        }
    }
}

/// 1種類のジオメトリをまとめたレイヤー
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    pub kind: SheetKind,
    pub features: Vec<Feature>,
}

impl LayerGroup {
    /// レイヤー切り替えコントロールに表示するラベル（件数付き）
    pub fn label(&self) -> String {
        format!("{} ({})", self.kind.label(), self.features.len())
    }
}

/// 組み立て済みの地図
///
/// 生成後は変更されません。出力フォーマッターに渡して破棄されます。
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    center: LatLng,
    bounds: Option<Bounds>,
    layers: Vec<LayerGroup>,
    options: MapOptions,
}

impl MapDocument {
    /// 地物をレイヤーにまとめ、中心と外接矩形を計算する
    ///
    /// 中心はすべての地物の緯度・経度の平均です。地物が1つもない場合は
    /// [`DEFAULT_CENTER`]になります。`options.center`が指定されている場合は
    /// それが優先されます。
    ///
    /// レイヤーは[`SheetKind::ALL`]の順に並び、地物のない種別は含まれません。
    pub fn assemble(features: Vec<Feature>, options: MapOptions) -> Self {
        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        let mut count = 0usize;
        let mut bounds: Option<Bounds> = None;

        for point in features.iter().flat_map(Feature::anchor_points) {
            lat_sum += point.lat;
            lon_sum += point.lon;
            count += 1;
            match bounds.as_mut() {
                Some(b) => b.extend(*point),
                None => bounds = Some(Bounds::from_point(*point)),
            }
        }

        let computed = if count > 0 {
            LatLng::new(lat_sum / count as f64, lon_sum / count as f64)
        } else {
            DEFAULT_CENTER
        };
        let center = options.center.unwrap_or(computed);

        let mut layers: Vec<LayerGroup> = SheetKind::ALL
            .into_iter()
            .map(|kind| LayerGroup {
                kind,
                features: Vec::new(),
            })
            .collect();
        for feature in features {
            let kind = feature.kind();
            if let Some(group) = layers.iter_mut().find(|g| g.kind == kind) {
                group.features.push(feature);
            }
        }
        layers.retain(|group| !group.features.is_empty());

        Self {
            center,
            bounds,
            layers,
            options,
        }
    }

    /// 地図の中心
    pub fn center(&self) -> LatLng {
        self.center
    }

    /// 全地物の外接矩形（地物がない場合は`None`）
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// 地物を持つレイヤー（描画順）
    pub fn layers(&self) -> &[LayerGroup] {
        &self.layers
    }

    /// 描画オプション
    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// 指定した種別の地物数
    pub fn feature_count(&self, kind: SheetKind) -> usize {
        self.layers
            .iter()
            .find(|g| g.kind == kind)
            .map(|g| g.features.len())
            .unwrap_or(0)
    }

    /// 全地物数
    pub fn total_features(&self) -> usize {
        self.layers.iter().map(|g| g.features.len()).sum()
    }
}
