//! Static assets referenced by the generated HTML page.
//!
//! The page loads Leaflet and its plugins from public CDNs and embeds
//! `MAP_SCRIPT`, which builds the layers from the JSON payload.

pub(crate) const STYLESHEETS: &[&str] = &[
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css",
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css",
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css",
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css",
    "https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css",
];

pub(crate) const SCRIPTS: &[&str] = &[
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js",
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js",
    "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js",
    "https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js",
];

pub(crate) const PAGE_STYLE: &str = "html, body, #map { width: 100%; height: 100%; margin: 0; padding: 0; }";

/// Expects a global `payload` object (see `HtmlPayload`).
pub(crate) const MAP_SCRIPT: &str = r#"(function (payload) {
  var map = L.map("map", { center: payload.center, zoom: payload.zoom });

  var baseLayers = {};
  payload.tiles.forEach(function (tile, index) {
    var layer = L.tileLayer(tile.url, {
      attribution: tile.attribution,
      subdomains: tile.subdomains,
      maxZoom: tile.max_zoom
    });
    if (index === 0) {
      layer.addTo(map);
    }
    baseLayers[tile.name] = layer;
  });

  function decorate(item, feature) {
    if (feature.tooltip) {
      item.bindTooltip(feature.tooltip);
    }
    if (feature.popup) {
      item.bindPopup(feature.popup, { maxWidth: 300 });
    }
    return item;
  }

  function buildFeature(kind, f) {
    switch (kind) {
      case "markers":
        return decorate(L.marker([f.lat, f.lon], {
          icon: L.AwesomeMarkers.icon({ icon: f.icon, markerColor: f.color, prefix: "glyphicon" })
        }), f);
      case "lines":
        return decorate(L.polyline(f.points, {
          color: f.color, weight: f.weight, opacity: f.opacity
        }), f);
      case "polygons":
        return decorate(L.polygon(f.points, {
          color: f.color, weight: f.weight, fill: true,
          fillColor: f.fill_color, fillOpacity: f.fill_opacity
        }), f);
      case "circles":
        return decorate(L.circle([f.lat, f.lon], {
          radius: f.radius, color: f.color, weight: f.weight, fill: true,
          fillColor: f.fill_color, fillOpacity: f.fill_opacity
        }), f);
    }
    return null;
  }

  var overlays = {};
  payload.layers.forEach(function (layer) {
    var group;
    if (layer.kind === "heatmap") {
      group = L.heatLayer(layer.features.map(function (f) {
        return [f.lat, f.lon, f.intensity];
      }));
    } else {
      group = (layer.kind === "markers" && payload.cluster) ? L.markerClusterGroup() : L.featureGroup();
      layer.features.forEach(function (f) {
        var item = buildFeature(layer.kind, f);
        if (item) {
          item.addTo(group);
        }
      });
    }
    group.addTo(map);
    overlays[layer.label] = group;
  });

  L.control.layers(baseLayers, overlays).addTo(map);

  if (payload.glow) {
    L.circleMarker(payload.center, {
      radius: payload.glow.radius,
      color: payload.glow.color,
      fill: true,
      fillColor: payload.glow.color,
      fillOpacity: payload.glow.fill_opacity
    }).bindPopup(payload.glow.popup).addTo(map);
  }

  if (payload.fit_bounds) {
    map.fitBounds(payload.fit_bounds);
  }
})(payload);"#;
